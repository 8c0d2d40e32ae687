use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rate::PairRates;

/// A candlestick data point in the shape the chart series consumes.
///
/// The hourly feed carries no intrabar extrema, so `low`/`high` are
/// reconstructed from `open`/`close`: `low = open` and `high = close`,
/// in that fixed assignment regardless of candle direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandlePoint {
    /// Unix seconds.
    pub time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

/// Shape hourly rate records into candle points for the selected display base.
///
/// The rate arrays are keyed by which token is being priced, not by display
/// order: when the canonical `token0` symbol equals the selected base
/// currency's symbol, the records denominated in the *other* token (`rate1`)
/// carry the wanted orientation, and vice versa. Dropping this inversion
/// shows inverted prices.
///
/// Returns `None` when no rate history is available (absent fetch, or the
/// selected orientation has no records). Loading-vs-empty is the caller's
/// concern; there is no error channel here.
pub fn format_candles(
    rates: Option<&PairRates>,
    token0_symbol: &str,
    base_symbol: &str,
) -> Option<Vec<CandlePoint>> {
    let rates = rates?;
    let source = if token0_symbol == base_symbol {
        &rates.rate1
    } else {
        &rates.rate0
    };
    if source.is_empty() {
        return None;
    }

    Some(
        source
            .iter()
            .map(|record| CandlePoint {
                time: record.timestamp,
                open: record.open,
                low: record.open,
                close: record.close,
                high: record.close,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::HourlyRate;
    use rust_decimal_macros::dec;

    fn rates() -> PairRates {
        PairRates {
            rate0: vec![HourlyRate {
                timestamp: 1000,
                open: dec!(1.0),
                close: dec!(1.1),
            }],
            rate1: vec![HourlyRate {
                timestamp: 1000,
                open: dec!(0.9),
                close: dec!(0.95),
            }],
        }
    }

    #[test]
    fn base_equals_token0_selects_rate1() {
        // KUNI/native selection, pair resolves token0=KUNI, token1=WKCS
        let candles = format_candles(Some(&rates()), "KUNI", "KUNI").unwrap();
        assert_eq!(
            candles,
            vec![CandlePoint {
                time: 1000,
                open: dec!(0.9),
                low: dec!(0.9),
                close: dec!(0.95),
                high: dec!(0.95),
            }]
        );
    }

    #[test]
    fn base_differs_from_token0_selects_rate0() {
        let candles = format_candles(Some(&rates()), "WKCS", "KUNI").unwrap();
        assert_eq!(candles[0].open, dec!(1.0));
        assert_eq!(candles[0].close, dec!(1.1));
    }

    #[test]
    fn inversion_holds_with_symbols_swapped() {
        // Same rates, but the pair canonicalized the other way around
        let selected = format_candles(Some(&rates()), "KUNI", "WKCS").unwrap();
        assert_eq!(selected[0].open, dec!(1.0));

        let inverted = format_candles(Some(&rates()), "WKCS", "WKCS").unwrap();
        assert_eq!(inverted[0].open, dec!(0.9));
    }

    #[test]
    fn low_is_open_even_when_close_below_open() {
        // The fixed assignment is intentional: the feed exposes no extrema,
        // and the chart tolerates low > high on down candles.
        let falling = PairRates {
            rate0: vec![HourlyRate {
                timestamp: 2000,
                open: dec!(2.0),
                close: dec!(1.5),
            }],
            rate1: Vec::new(),
        };
        let candles = format_candles(Some(&falling), "WKCS", "KUNI").unwrap();
        assert_eq!(candles[0].low, dec!(2.0));
        assert_eq!(candles[0].high, dec!(1.5));
    }

    #[test]
    fn absent_rates_yield_none() {
        assert!(format_candles(None, "KUNI", "KUNI").is_none());
    }

    #[test]
    fn empty_orientation_yields_none_not_empty_list() {
        let half = PairRates {
            rate0: rates().rate0,
            rate1: Vec::new(),
        };
        // Base = token0 wants rate1, which has no records
        assert!(format_candles(Some(&half), "KUNI", "KUNI").is_none());
    }
}
