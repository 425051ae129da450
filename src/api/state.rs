use std::sync::Arc;

use crate::config::AppConfig;
use crate::roster::RosterIndex;
use crate::services::{RefreshPipeline, SnapshotCache};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cache: Arc<SnapshotCache>,
    pub pipeline: Arc<RefreshPipeline>,
    pub roster: Arc<RosterIndex>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        cache: Arc<SnapshotCache>,
        pipeline: Arc<RefreshPipeline>,
        roster: Arc<RosterIndex>,
    ) -> Self {
        Self {
            config,
            cache,
            pipeline,
            roster,
        }
    }
}
