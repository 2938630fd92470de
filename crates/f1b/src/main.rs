use std::sync::Arc;

use f1b_core::{config::Config, ports::DataProvider};
use f1b_ergast::ErgastClient;

#[tokio::main]
async fn main() -> Result<(), f1b_core::Error> {
    f1b_core::logging::init("f1b")?;

    let cfg = Arc::new(Config::load()?);

    let provider: Arc<dyn DataProvider> = Arc::new(ErgastClient::new(
        cfg.ergast_base_url.clone(),
        cfg.http_timeout,
    )?);

    f1b_telegram::router::run_polling(cfg, provider)
        .await
        .map_err(|e| f1b_core::Error::External(format!("telegram bot failed: {e}")))?;

    tracing::info!("f1b stopped");
    Ok(())
}
