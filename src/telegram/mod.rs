//! All Telegram-specific functionality

pub mod bot;
pub mod client;

// Re-export main types for convenience
pub use bot::{BotClient, LogUpdates, TelegramBot, UpdateHandler};
pub use client::{ApiResponse, TelegramClient};
