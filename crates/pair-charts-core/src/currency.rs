use serde::{Deserialize, Serialize};

/// Chain id of the exchange deployment (KCC mainnet).
pub const DEFAULT_CHAIN_ID: u64 = 321;

/// Symbol of the chain-native asset.
pub const NATIVE_SYMBOL: &str = "KCS";

/// Identifier the frontend router uses for the native asset in URLs.
pub const NATIVE_CURRENCY_ID: &str = "ETH";

/// Default base token offered on first load.
pub const KUNI_ADDRESS: &str = "0xAd4D2bd157039A25bCc519f9093BbEc6D8953183";

/// An ERC-20 token identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenInfo {
    pub chain_id: u64,
    pub address: String,
    pub decimals: u8,
    pub symbol: String,
}

impl TokenInfo {
    pub fn new(
        chain_id: u64,
        address: impl Into<String>,
        decimals: u8,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            chain_id,
            address: address.into(),
            decimals,
            symbol: symbol.into(),
        }
    }
}

/// A selectable currency: the chain-native asset or a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Native { chain_id: u64 },
    Token(TokenInfo),
}

impl Currency {
    pub fn native(chain_id: u64) -> Self {
        Self::Native { chain_id }
    }

    pub fn token(
        chain_id: u64,
        address: impl Into<String>,
        decimals: u8,
        symbol: impl Into<String>,
    ) -> Self {
        Self::Token(TokenInfo::new(chain_id, address, decimals, symbol))
    }

    /// The default selection on first load: KUNI against the native asset.
    pub fn default_selection() -> (Self, Self) {
        (
            Self::token(DEFAULT_CHAIN_ID, KUNI_ADDRESS, 18, "KUNI"),
            Self::native(DEFAULT_CHAIN_ID),
        )
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native { .. })
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Native { chain_id } => *chain_id,
            Self::Token(token) => token.chain_id,
        }
    }

    /// Display symbol; the native asset reports the chain symbol.
    pub fn symbol(&self) -> &str {
        match self {
            Self::Native { .. } => NATIVE_SYMBOL,
            Self::Token(token) => &token.symbol,
        }
    }

    /// Identifier used in swap/liquidity URLs: the token address, or the
    /// router's fixed native marker.
    pub fn id(&self) -> &str {
        match self {
            Self::Native { .. } => NATIVE_CURRENCY_ID,
            Self::Token(token) => &token.address,
        }
    }
}
