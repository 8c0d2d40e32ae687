use tracing::debug;

use crate::candle::{CandlePoint, format_candles};
use crate::currency::Currency;
use crate::pair::{Pair, PairState};
use crate::rate::PairRates;
use crate::window::TimeWindow;

/// Which selector slot a currency pick targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Token0,
    Token1,
}

/// Lifecycle phase of the chart view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No pair resolved for the current selection.
    Empty,
    /// Waiting on pair resolution or rate history.
    Loading,
    /// Candles on screen for this pair.
    Ready { pair_address: String },
    /// A selection change superseded this pair; awaiting the new resolution.
    Stale { pair_address: String },
}

/// Instruction for the chart lifecycle, produced by [`ViewState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEffect {
    /// Nothing to do.
    None,
    /// Destroy the current chart; the selection changed.
    Teardown,
    /// Create a chart with these candles (none exists).
    Create(Vec<CandlePoint>),
    /// Update the existing chart's data in place.
    Refresh(Vec<CandlePoint>),
}

/// Events feeding the reconciler.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// The user committed a currency pick for one slot.
    CurrencySelected { field: Field, currency: Currency },
    /// The user picked a different history window.
    WindowChanged(TimeWindow),
    /// Pair resolution settled for the current selection.
    PairResolved {
        state: PairState,
        pair: Option<Pair>,
    },
    /// Hourly rate history arrived for a pair. Keyed by pair address so
    /// results for superseded selections can be discarded.
    RatesArrived {
        pair_address: String,
        rates: PairRates,
    },
    /// Pair resolution or the rate fetch failed; treated as no data.
    ResolutionFailed,
}

/// The page's view state as one explicit record.
///
/// Chart creation and teardown are a pure function of the transitions here
/// rather than of render timing. The caller owns the actual
/// [`crate::chart::ChartLifecycle`] and executes the returned effects.
#[derive(Debug, Clone)]
pub struct ViewState {
    currency0: Currency,
    currency1: Currency,
    window: TimeWindow,
    phase: Phase,
    pair: Option<Pair>,
    rates: Option<PairRates>,
    chart_exists: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        let (currency0, currency1) = Currency::default_selection();
        Self {
            currency0,
            currency1,
            window: TimeWindow::Week,
            phase: Phase::Empty,
            pair: None,
            rates: None,
            chart_exists: false,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn currency0(&self) -> &Currency {
        &self.currency0
    }

    pub fn currency1(&self) -> &Currency {
        &self.currency1
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn pair(&self) -> Option<&Pair> {
        self.pair.as_ref()
    }

    pub fn chart_exists(&self) -> bool {
        self.chart_exists
    }

    /// Candles for the current selection, or `None` while loading / empty.
    pub fn candles(&self) -> Option<Vec<CandlePoint>> {
        let pair = self.pair.as_ref()?;
        format_candles(
            self.rates.as_ref(),
            &pair.token0.symbol,
            self.currency0.symbol(),
        )
    }

    /// Advance the state machine and return the chart effect to execute.
    pub fn apply(&mut self, event: ViewEvent) -> ChartEffect {
        match event {
            ViewEvent::CurrencySelected { field, currency } => {
                self.select_currency(field, currency)
            }
            ViewEvent::WindowChanged(window) => self.change_window(window),
            ViewEvent::PairResolved { state, pair } => self.pair_resolved(state, pair),
            ViewEvent::RatesArrived { pair_address, rates } => {
                self.rates_arrived(pair_address, rates)
            }
            ViewEvent::ResolutionFailed => self.clear_to_empty(),
        }
    }

    /// Creation failed (e.g. the surface was not mounted); forget the chart
    /// so the next data arrival retries.
    pub fn chart_creation_failed(&mut self) {
        self.chart_exists = false;
        if let Phase::Ready { pair_address } = self.phase.clone() {
            self.phase = Phase::Loading;
            debug!(%pair_address, "chart creation failed, back to loading");
        }
    }

    fn select_currency(&mut self, field: Field, currency: Currency) -> ChartEffect {
        match field {
            Field::Token0 => self.currency0 = currency,
            Field::Token1 => self.currency1 = currency,
        }
        self.pair = None;
        self.rates = None;

        if self.chart_exists {
            self.chart_exists = false;
            let pair_address = match &self.phase {
                Phase::Ready { pair_address } | Phase::Stale { pair_address } => {
                    pair_address.clone()
                }
                _ => String::new(),
            };
            self.phase = Phase::Stale { pair_address };
            ChartEffect::Teardown
        } else {
            self.phase = Phase::Loading;
            ChartEffect::None
        }
    }

    fn change_window(&mut self, window: TimeWindow) -> ChartEffect {
        self.window = window;
        self.rates = None;
        // The chart survives a window change; only the data is refetched.
        if self.pair.is_some() {
            self.phase = Phase::Loading;
        }
        ChartEffect::None
    }

    fn pair_resolved(&mut self, state: PairState, pair: Option<Pair>) -> ChartEffect {
        match state {
            PairState::Exists => match pair {
                Some(pair) => {
                    debug!(address = %pair.address, "pair resolved");
                    self.pair = Some(pair);
                    self.phase = Phase::Loading;
                    ChartEffect::None
                }
                None => self.clear_to_empty(),
            },
            PairState::Loading => {
                self.phase = Phase::Loading;
                ChartEffect::None
            }
            PairState::NotExists | PairState::Invalid => self.clear_to_empty(),
        }
    }

    fn rates_arrived(&mut self, pair_address: String, rates: PairRates) -> ChartEffect {
        let Some(pair) = &self.pair else {
            debug!(%pair_address, "discarding rates: no pair resolved");
            return ChartEffect::None;
        };
        if pair.address != pair_address {
            debug!(%pair_address, current = %pair.address, "discarding rates for superseded pair");
            return ChartEffect::None;
        }

        let candles = format_candles(Some(&rates), &pair.token0.symbol, self.currency0.symbol());
        self.rates = Some(rates);

        match candles {
            None => {
                // Fetched, but nothing chartable for this orientation.
                self.phase = Phase::Loading;
                ChartEffect::None
            }
            Some(candles) => {
                self.phase = Phase::Ready { pair_address };
                if self.chart_exists {
                    ChartEffect::Refresh(candles)
                } else {
                    self.chart_exists = true;
                    ChartEffect::Create(candles)
                }
            }
        }
    }

    fn clear_to_empty(&mut self) -> ChartEffect {
        self.pair = None;
        self.rates = None;
        self.phase = Phase::Empty;
        if self.chart_exists {
            self.chart_exists = false;
            ChartEffect::Teardown
        } else {
            ChartEffect::None
        }
    }
}
