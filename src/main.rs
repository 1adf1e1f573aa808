use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use tradesight_backend::app;
use tradesight_backend::external::yahoo::YahooFinanceProvider;
use tradesight_backend::logging::{self, LoggingConfig};
use tradesight_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let state = AppState {
        market_data: Arc::new(YahooFinanceProvider::new()),
    };
    let app = app::create_app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Tradesight backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
