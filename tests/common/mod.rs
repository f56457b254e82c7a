#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use telehook::core::models::WebhookParams;
use telehook::errors::HookError;
use telehook::telegram::BotClient;

/// Bot that records every call and answers with canned results.
#[derive(Default)]
pub struct RecordingBot {
    pub set_webhook_calls: AtomicUsize,
    pub receive_calls: AtomicUsize,
    pub webhooks: Mutex<Vec<WebhookParams>>,
    pub updates: Mutex<Vec<Vec<Value>>>,
    pub fail_with: Option<(i64, String)>,
}

impl RecordingBot {
    pub fn failing(code: i64, description: &str) -> Self {
        Self {
            fail_with: Some((code, description.to_string())),
            ..Self::default()
        }
    }

    pub fn webhook_calls(&self) -> usize {
        self.set_webhook_calls.load(Ordering::SeqCst)
    }

    pub fn receive_calls(&self) -> usize {
        self.receive_calls.load(Ordering::SeqCst)
    }

    fn failure(&self) -> Option<HookError> {
        self.fail_with.as_ref().map(|(code, description)| HookError::Api {
            code: *code,
            description: description.clone(),
        })
    }
}

#[async_trait]
impl BotClient for RecordingBot {
    async fn set_webhook(&self, params: &WebhookParams) -> Result<Value, HookError> {
        self.set_webhook_calls.fetch_add(1, Ordering::SeqCst);
        self.webhooks.lock().unwrap().push(params.clone());
        if let Some(err) = self.failure() {
            return Err(err);
        }
        Ok(json!({"ok": true, "result": true, "description": "Webhook was set"}))
    }

    async fn receive_updates(&self, updates: Vec<Value>) -> Result<Value, HookError> {
        self.receive_calls.fetch_add(1, Ordering::SeqCst);
        self.updates.lock().unwrap().push(updates.clone());
        if let Some(err) = self.failure() {
            return Err(err);
        }
        Ok(json!({"handled": updates.len()}))
    }
}
