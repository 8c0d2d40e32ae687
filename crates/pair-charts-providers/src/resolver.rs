use async_trait::async_trait;
use pair_charts_core::currency::Currency;
use pair_charts_core::pair::{Pair, PairState};

use crate::error::ProviderError;

/// Trait for resolving the trading pair behind a currency selection.
#[async_trait]
pub trait PairResolver: Send + Sync {
    /// Resolver name (for logging/display).
    fn name(&self) -> &str;

    /// Resolve the pair for two currencies.
    ///
    /// Returns the pair state together with the canonical pair when it
    /// exists. `NotExists` carries no pair; `Invalid` means the selection
    /// cannot form a pair at all (same asset twice).
    async fn resolve_pair(
        &self,
        currency0: &Currency,
        currency1: &Currency,
    ) -> Result<(PairState, Option<Pair>), ProviderError>;
}
