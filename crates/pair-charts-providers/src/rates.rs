use async_trait::async_trait;
use pair_charts_core::rate::PairRates;
use pair_charts_core::window::TimeWindow;

use crate::error::ProviderError;

/// Trait for fetching hourly rate history for a pair.
#[async_trait]
pub trait RateHistory: Send + Sync {
    /// Provider name (for logging/display).
    fn name(&self) -> &str;

    /// Fetch hourly rate records for a pair over a time window.
    ///
    /// Returns both token orientations, each sorted by timestamp. An empty
    /// result means the pair has no recorded hours in the window.
    async fn fetch_hourly_rates(
        &self,
        pair_address: &str,
        window: TimeWindow,
    ) -> Result<PairRates, ProviderError>;
}
