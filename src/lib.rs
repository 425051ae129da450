pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod roster;
pub mod services;

pub use adapters::{OddsApiClient, OddsSource, ProjectionsClient, ProjectionsSource, TeamBoosts};
pub use config::AppConfig;
pub use domain::{AdjustedOutcome, Snapshot, SnapshotRow};
pub use engine::UnknownTeamPolicy;
pub use error::{Result, TdError};
pub use roster::RosterIndex;
pub use services::{RefreshPipeline, SnapshotCache, SnapshotRefresher};
