//! External collaborators for the chart page: pair resolution and hourly
//! rate history, behind async traits, with an exchange-subgraph HTTP
//! implementation.

pub mod error;
pub mod rates;
pub mod resolver;
pub mod subgraph;
