use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Requested range of hourly rate history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    Day,
    Week,
    Month,
}

impl TimeWindow {
    /// Span of history the window covers.
    pub fn duration(&self) -> Duration {
        match self {
            TimeWindow::Day => Duration::days(1),
            TimeWindow::Week => Duration::days(7),
            TimeWindow::Month => Duration::days(30),
        }
    }

    /// Start of the window counting back from `now`.
    pub fn start_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
        }
    }
}
