//! Core types and logic for DEX pair candlestick charts: currency selection,
//! hourly rate shaping, the view-state reconciler, and the chart lifecycle.

pub mod candle;
pub mod chart;
pub mod currency;
pub mod error;
pub mod links;
pub mod pair;
pub mod rate;
pub mod view;
pub mod window;
