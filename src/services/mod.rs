pub mod cache;
pub mod refresh;

pub use cache::{SnapshotCache, SnapshotRefresher};
pub use refresh::RefreshPipeline;
