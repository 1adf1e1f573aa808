use std::sync::Arc;

use crate::external::market_data::MarketDataProvider;

/// Shared per-process state. The provider is the only shared dependency;
/// requests hold no other state.
#[derive(Clone)]
pub struct AppState {
    pub market_data: Arc<dyn MarketDataProvider>,
}
