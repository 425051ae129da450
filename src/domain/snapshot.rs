//! Response types for the adjusted-odds snapshot.

use serde::{Deserialize, Serialize};

/// Round to 4 decimal places for probability-like fields
pub fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Round to 2 decimal places for percentage fields
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Round to 1 decimal place for display percentages
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Book side of an outcome: the price as quoted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookQuote {
    pub odds_american: i64,
    pub implied_probability: f64,
    pub implied_probability_pct: f64,
}

/// Adjusted side of an outcome: probability after the team lift
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdjustedQuote {
    pub team_lift: f64,
    pub probability: f64,
    pub probability_pct: f64,
    pub fair_odds_american: i64,
}

/// Edge of the adjusted probability versus the book's number
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    /// Absolute probability difference, e.g. +0.039 = +3.9 pp
    pub probability_points: f64,
    pub probability_points_pct: f64,
    /// Relative uplift; null when the book probability is zero
    pub relative_uplift_pct: Option<f64>,
}

/// One fully adjusted player outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdjustedOutcome {
    pub player_name: String,
    /// Resolved team abbreviation, or "TBD" when the roster cannot place the player
    pub team: String,
    /// Fixture label, "AWAY @ HOME"
    pub game: String,
    pub commence_time: Option<String>,
    pub bookmaker: String,
    pub book: BookQuote,
    pub adjusted: AdjustedQuote,
    pub edge: Edge,
}

/// A row in the snapshot's player list: either a computed outcome or an
/// inline per-fixture error record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SnapshotRow {
    Outcome(AdjustedOutcome),
    Error { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceInfo {
    pub team_projections_url: String,
    pub odds_api: String,
    pub bookmaker_priority: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    /// Outcomes produced (error rows excluded)
    pub players: usize,
    /// Teams for which a boost could be computed this refresh
    pub teams_with_boosts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Methodology {
    pub team_lift: String,
    pub adjustment: String,
    pub fair_odds: String,
}

impl Default for Methodology {
    fn default() -> Self {
        Self {
            team_lift: "projected_team_TDs / vegas_team_TDs".to_string(),
            adjustment: "adjusted_prob = book_implied_prob * team_lift (clamped [1%,95%])"
                .to_string(),
            fair_odds: "probability_to_american(adjusted_prob)".to_string(),
        }
    }
}

/// One refresh's worth of ranked outcomes plus provenance. Exactly one live
/// snapshot exists at a time; a refresh replaces it atomically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub analysis_date: String,
    pub source: SourceInfo,
    pub summary: Summary,
    pub methodology: Methodology,
    pub players: Vec<SnapshotRow>,
}
