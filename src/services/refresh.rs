//! The refresh pipeline: ingest team boosts, enumerate fixtures, process
//! each fixture's anytime-TD market, rank by edge, and produce a snapshot.
//!
//! Boost ingestion and fixture enumeration are hard failures for the whole
//! refresh; a single fixture's failure becomes an inline error row and never
//! aborts its siblings.

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::{Event, OddsSource, ProjectionsSource, TeamBoosts};
use crate::config::AppConfig;
use crate::domain::{AdjustedOutcome, Methodology, Snapshot, SnapshotRow, SourceInfo, Summary};
use crate::engine::{process_event, UnknownTeamPolicy};
use crate::error::Result;
use crate::roster::RosterIndex;
use crate::services::cache::SnapshotRefresher;

pub struct RefreshPipeline {
    projections: Arc<dyn ProjectionsSource>,
    odds: Arc<dyn OddsSource>,
    roster: Arc<RosterIndex>,
    policy: UnknownTeamPolicy,
    bookmaker_priority: Vec<String>,
    fixture_concurrency: usize,
    projections_url: String,
}

impl RefreshPipeline {
    pub fn new(
        projections: Arc<dyn ProjectionsSource>,
        odds: Arc<dyn OddsSource>,
        roster: Arc<RosterIndex>,
        config: &AppConfig,
    ) -> Self {
        Self {
            projections,
            odds,
            roster,
            policy: config.engine.unknown_team_policy,
            bookmaker_priority: config.odds.bookmaker_priority.clone(),
            fixture_concurrency: config.engine.fixture_concurrency.max(1),
            projections_url: config.projections.url.clone(),
        }
    }

    /// Run one full refresh.
    pub async fn run(&self) -> Result<Snapshot> {
        let boosts = self.projections.fetch_team_boosts().await?;
        let events = self.odds.list_events().await?;
        info!(
            events = events.len(),
            boosted_teams = boosts.len(),
            "starting refresh"
        );

        // Fixtures are independent; fetch them with bounded fan-out but keep
        // arrival order so ranking ties stay deterministic.
        let boosts_ref = &boosts;
        let fixture_results: Vec<(String, Result<Vec<AdjustedOutcome>>)> =
            stream::iter(events.into_iter())
                .map(|event| async move {
                    let id = event.id.clone();
                    (id, self.process_fixture(&event, boosts_ref).await)
                })
                .buffered(self.fixture_concurrency)
                .collect()
                .await;

        let mut outcomes = Vec::new();
        let mut error_rows = Vec::new();
        for (event_id, result) in fixture_results {
            match result {
                Ok(rows) => outcomes.extend(rows),
                Err(e) => {
                    warn!("fixture {} failed: {}", event_id, e);
                    error_rows.push(SnapshotRow::Error {
                        error: format!("Failed processing game {}: {}", event_id, e),
                    });
                }
            }
        }

        // Best value first; stable, so equal edges keep fetch order
        outcomes.sort_by(|a, b| {
            b.edge
                .probability_points
                .partial_cmp(&a.edge.probability_points)
                .unwrap_or(Ordering::Equal)
        });

        let summary = Summary {
            players: outcomes.len(),
            teams_with_boosts: boosts.len(),
        };

        let players: Vec<SnapshotRow> = outcomes
            .into_iter()
            .map(SnapshotRow::Outcome)
            .chain(error_rows)
            .collect();

        Ok(Snapshot {
            analysis_date: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            source: SourceInfo {
                team_projections_url: self.projections_url.clone(),
                odds_api: "the-odds-api.com".to_string(),
                bookmaker_priority: self.bookmaker_priority.clone(),
            },
            summary,
            methodology: Methodology::default(),
            players,
        })
    }

    async fn process_fixture(
        &self,
        event: &Event,
        boosts: &TeamBoosts,
    ) -> Result<Vec<AdjustedOutcome>> {
        let Some(odds) = self.odds.event_odds(&event.id).await? else {
            return Ok(Vec::new());
        };
        Ok(process_event(
            event,
            &odds,
            boosts,
            &self.roster,
            self.policy,
            &self.bookmaker_priority,
        ))
    }
}

#[async_trait]
impl SnapshotRefresher for RefreshPipeline {
    async fn refresh(&self) -> Result<Snapshot> {
        self.run().await
    }
}
