use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::external::market_data::MarketDataError;

#[derive(Debug, Error)]
pub enum AppError {
    /// The provider returned an empty history (bad symbol, delisted, market
    /// never open in the window). Client-correctable.
    #[error("No data found for {0}")]
    NoData(String),
    /// Transport or provider-side failure. Possibly transient; not retried.
    #[error("Error fetching data: {0}")]
    Provider(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NoData(_) | AppError::Provider(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<MarketDataError> for AppError {
    fn from(err: MarketDataError) -> Self {
        match err {
            MarketDataError::NoData(symbol) => AppError::NoData(symbol),
            other => AppError::Provider(other.to_string()),
        }
    }
}
