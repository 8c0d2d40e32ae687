use serde::{Deserialize, Serialize};

use crate::currency::TokenInfo;

/// Resolution state of a trading pair for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairState {
    /// Resolution in flight.
    Loading,
    /// The pair exists on the exchange.
    Exists,
    /// No such pair on the exchange.
    NotExists,
    /// The selection cannot form a pair (e.g. same token twice).
    Invalid,
}

/// A resolved trading pair. `token0`/`token1` are in the protocol's canonical
/// order (sorted by address), which may differ from the user's selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub address: String,
    pub token0: TokenInfo,
    pub token1: TokenInfo,
}

impl Pair {
    /// Build a pair, putting the tokens into canonical address order.
    pub fn new(address: impl Into<String>, a: TokenInfo, b: TokenInfo) -> Self {
        let (token0, token1) = if a.address.to_lowercase() <= b.address.to_lowercase() {
            (a, b)
        } else {
            (b, a)
        };
        Self {
            address: address.into(),
            token0,
            token1,
        }
    }
}
