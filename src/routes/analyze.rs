use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{AnalysisResponse, AnalyzeRequest, Timeframe};
use crate::services::analysis;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze_stock))
}

/// Analyze a ticker and generate a trading signal.
///
/// Validates the request, fetches the bounded history for the timeframe and
/// runs the indicator & signal engine over it. The fetch is the only await
/// point; everything after it is pure computation.
#[axum::debug_handler]
async fn analyze_stock(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let symbol = request.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::Validation("symbol must not be empty".to_string()));
    }

    let timeframe = Timeframe::parse(&request.timeframe).ok_or_else(|| {
        AppError::Validation(format!("unsupported timeframe: {}", request.timeframe))
    })?;

    info!("POST /analyze - symbol={}, timeframe={}", symbol, timeframe);

    let bars = state.market_data.fetch_history(&symbol, timeframe).await?;
    let response = analysis::analyze(&bars, &symbol, timeframe)?;

    info!(
        "Analyzed {} bars for {}: {} {}",
        bars.len(),
        symbol,
        response.signal,
        response.signal_strength
    );

    Ok(Json(response))
}
