pub mod odds;
pub mod snapshot;

pub use odds::{
    american_to_probability, clamp_adjusted, clamp_probability, decimal_to_american,
    probability_to_american, PriceFormat,
};
pub use snapshot::{
    AdjustedOutcome, AdjustedQuote, BookQuote, Edge, Methodology, Snapshot, SnapshotRow,
    SourceInfo, Summary,
};
