//! Shared stub upstreams for integration tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use tdedge::adapters::{Event, EventOdds, OddsSource, ProjectionsSource, TeamBoosts};
use tdedge::config::{
    AppConfig, CacheConfig, EngineConfig, LoggingConfig, OddsApiConfig, ProjectionsConfig,
    ServerConfig,
};
use tdedge::{Result, TdError, UnknownTeamPolicy};

pub struct StubProjections {
    pub boosts: TeamBoosts,
    pub fail: bool,
}

#[async_trait]
impl ProjectionsSource for StubProjections {
    async fn fetch_team_boosts(&self) -> Result<TeamBoosts> {
        if self.fail {
            return Err(TdError::UpstreamUnavailable(
                "projections feed down".to_string(),
            ));
        }
        Ok(self.boosts.clone())
    }
}

pub struct StubOdds {
    pub events: Vec<Event>,
    pub odds: HashMap<String, EventOdds>,
    pub failing_events: HashSet<String>,
}

#[async_trait]
impl OddsSource for StubOdds {
    async fn list_events(&self) -> Result<Vec<Event>> {
        Ok(self.events.clone())
    }

    async fn event_odds(&self, event_id: &str) -> Result<Option<EventOdds>> {
        if self.failing_events.contains(event_id) {
            return Err(TdError::UpstreamUnavailable(format!(
                "timeout fetching {}",
                event_id
            )));
        }
        Ok(self.odds.get(event_id).cloned())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        odds: OddsApiConfig {
            api_key: "test-key".to_string(),
            base_url: "https://api.the-odds-api.com/v4".to_string(),
            bookmaker_priority: vec!["fanduel".to_string(), "draftkings".to_string()],
        },
        projections: ProjectionsConfig {
            url: "http://projections.test/team-analysis".to_string(),
        },
        cache: CacheConfig { ttl_secs: 3600 },
        engine: EngineConfig {
            unknown_team_policy: UnknownTeamPolicy::NoBoost,
            roster_path: None,
            fixture_concurrency: 4,
        },
        server: ServerConfig::default(),
        logging: LoggingConfig::default(),
    }
}

pub fn event(id: &str, away: &str, home: &str) -> Event {
    Event {
        id: id.to_string(),
        away_team: Some(away.to_string()),
        home_team: Some(home.to_string()),
        commence_time: Some("2026-09-13T17:00:00Z".to_string()),
    }
}

/// Single-bookmaker anytime-TD payload from (player, price) pairs.
pub fn fanduel_market(outcomes: &[(&str, f64)]) -> EventOdds {
    let raw = serde_json::json!({
        "bookmakers": [{
            "key": "fanduel",
            "markets": [{
                "key": "player_anytime_td",
                "outcomes": outcomes.iter().map(|(player, price)| {
                    serde_json::json!({"name": "Yes", "description": player, "price": price})
                }).collect::<Vec<_>>()
            }]
        }]
    });
    serde_json::from_value(raw).unwrap()
}
