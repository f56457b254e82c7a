use std::sync::Arc;
use telehook::api::{Router, function_handler};

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    telehook::setup_logging();

    let router = Arc::new(Router::from_env()?);
    lambda_runtime::run(lambda_runtime::service_fn(move |event| {
        let router = Arc::clone(&router);
        async move { function_handler(&router, event).await }
    }))
    .await
}
