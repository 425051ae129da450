//! Team TD projections upstream (Upstream A).
//!
//! One record per fixture carrying each side's projected and
//! sportsbook-implied touchdown counts. A transport failure here is a hard
//! failure for the whole refresh; there are no retries at this layer.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

use super::REQUEST_TIMEOUT_SECS;
use crate::error::{Result, TdError};

/// Team identifier -> scoring-rate multiplier (projected TDs / vegas TDs).
/// Absence of a team means a neutral 1.0, never zero.
pub type TeamBoosts = HashMap<String, f64>;

#[derive(Debug, Clone, Deserialize)]
struct ProjectionsResponse {
    #[serde(default)]
    games: Vec<GameProjection>,
}

#[derive(Debug, Clone, Deserialize)]
struct GameProjection {
    away_team: Option<String>,
    home_team: Option<String>,
    #[serde(default)]
    away_vegas_tds: f64,
    #[serde(default)]
    away_projected_tds: f64,
    #[serde(default)]
    home_vegas_tds: f64,
    #[serde(default)]
    home_projected_tds: f64,
}

/// Source of the per-team boost mapping. Trait seam so the refresh pipeline
/// can be exercised without the network.
#[async_trait]
pub trait ProjectionsSource: Send + Sync {
    async fn fetch_team_boosts(&self) -> Result<TeamBoosts>;
}

#[derive(Clone)]
pub struct ProjectionsClient {
    http: Client,
    url: String,
}

impl ProjectionsClient {
    pub fn new(url: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent("tdedge-projections/0.1")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                TdError::Internal(format!("failed to build projections HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl ProjectionsSource for ProjectionsClient {
    async fn fetch_team_boosts(&self) -> Result<TeamBoosts> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;

        let data: ProjectionsResponse = resp.json().await?;
        let boosts = boosts_from_games(&data.games);
        info!("Computed boosts for {} teams", boosts.len());
        Ok(boosts)
    }
}

/// Compute the boost map from the feed's game records. A side is included
/// only when its vegas count is strictly positive.
fn boosts_from_games(games: &[GameProjection]) -> TeamBoosts {
    let mut boosts = TeamBoosts::new();
    for g in games {
        if let Some(away) = &g.away_team {
            if g.away_vegas_tds > 0.0 {
                boosts.insert(away.clone(), g.away_projected_tds / g.away_vegas_tds);
            }
        }
        if let Some(home) = &g.home_team {
            if g.home_vegas_tds > 0.0 {
                boosts.insert(home.clone(), g.home_projected_tds / g.home_vegas_tds);
            }
        }
    }
    boosts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boosts_skip_zero_vegas_sides() {
        let games = vec![GameProjection {
            away_team: Some("CIN".to_string()),
            home_team: Some("BAL".to_string()),
            away_vegas_tds: 2.5,
            away_projected_tds: 3.0,
            home_vegas_tds: 0.0,
            home_projected_tds: 2.0,
        }];
        let boosts = boosts_from_games(&games);
        assert_eq!(boosts.len(), 1);
        assert!((boosts["CIN"] - 1.2).abs() < 1e-9);
        assert!(!boosts.contains_key("BAL"));
    }

    #[test]
    fn test_boosts_parse_feed_shape() {
        let raw = r#"{
            "games": [
                {
                    "away_team": "DAL",
                    "home_team": "PHI",
                    "away_vegas_tds": 2.0,
                    "away_projected_tds": 2.3,
                    "home_vegas_tds": 3.0,
                    "home_projected_tds": 2.7
                }
            ]
        }"#;
        let data: ProjectionsResponse = serde_json::from_str(raw).unwrap();
        let boosts = boosts_from_games(&data.games);
        assert!((boosts["DAL"] - 1.15).abs() < 1e-9);
        assert!((boosts["PHI"] - 0.9).abs() < 1e-9);
    }
}
