pub mod odds_api;
pub mod projections;

pub use odds_api::{
    Bookmaker, Event, EventOdds, Market, OddsApiClient, OddsSource, Outcome,
    ANYTIME_TD_MARKET_KEY,
};
pub use projections::{ProjectionsClient, ProjectionsSource, TeamBoosts};

/// Per-request timeout for both upstreams. Expiry is a fixture-level
/// failure, never a process-level one.
pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 30;
