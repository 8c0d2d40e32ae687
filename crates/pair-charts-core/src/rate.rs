use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// One hourly rate bucket for a pair, denominated in one of the two tokens.
/// The feed has no intrabar extrema; only open and close are trustworthy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRate {
    /// Unix seconds at the start of the hour bucket.
    #[serde(deserialize_with = "timestamp_from_wire")]
    pub timestamp: i64,
    #[serde(deserialize_with = "decimal_from_wire")]
    pub open: Decimal,
    #[serde(deserialize_with = "decimal_from_wire")]
    pub close: Decimal,
}

/// Hourly rate history for a pair: two parallel arrays, one per token
/// treated as the price base. `rate0` prices token1 in token0, `rate1`
/// is the inverse orientation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairRates {
    pub rate0: Vec<HourlyRate>,
    pub rate1: Vec<HourlyRate>,
}

impl PairRates {
    pub fn is_empty(&self) -> bool {
        self.rate0.is_empty() && self.rate1.is_empty()
    }
}

/// The subgraph serves numerics inconsistently as JSON numbers or strings.
fn decimal_from_wire<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(v) => Decimal::try_from(v).map_err(serde::de::Error::custom),
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

fn timestamp_from_wire<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(v) => Ok(v),
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
