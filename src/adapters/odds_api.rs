//! The Odds API upstream (Upstream B): current NFL fixtures plus per-fixture
//! anytime-touchdown markets.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::REQUEST_TIMEOUT_SECS;
use crate::error::{Result, TdError};

pub const ANYTIME_TD_MARKET_KEY: &str = "player_anytime_td";
const SPORT_KEY: &str = "americanfootball_nfl";

/// A scheduled fixture as listed by the odds API.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub commence_time: Option<String>,
}

/// Per-fixture odds payload: bookmakers -> markets -> outcomes.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EventOdds {
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bookmaker {
    pub key: String,
    #[serde(default)]
    pub markets: Vec<Market>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Market {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

/// One (selection, player, price) triple within a market. The price may be
/// American or decimal; the format is untagged and inferred downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct Outcome {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Sportsbook data source. Trait seam so the pipeline can run against stubs.
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// List current NFL fixtures.
    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Fetch the anytime-TD odds for one fixture. `None` means the upstream
    /// answered without a usable payload; that fixture contributes nothing.
    async fn event_odds(&self, event_id: &str) -> Result<Option<EventOdds>>;
}

#[derive(Clone)]
pub struct OddsApiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OddsApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent("tdedge-odds-api/0.1")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TdError::Internal(format!("failed to build odds HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl OddsSource for OddsApiClient {
    async fn list_events(&self) -> Result<Vec<Event>> {
        let url = format!("{}/sports/{}/events", self.base_url, SPORT_KEY);
        let resp = self
            .http
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let events: Vec<Event> = resp.json().await?;
        debug!("Listed {} NFL events", events.len());
        Ok(events)
    }

    async fn event_odds(&self, event_id: &str) -> Result<Option<EventOdds>> {
        let url = format!(
            "{}/sports/{}/events/{}/odds",
            self.base_url, SPORT_KEY, event_id
        );
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("markets", ANYTIME_TD_MARKET_KEY),
                ("regions", "us"),
            ])
            .send()
            .await?;

        // A non-success status for a single fixture is an empty contribution,
        // not a refresh failure.
        if !resp.status().is_success() {
            debug!(
                "Odds fetch for event {} returned {}",
                event_id,
                resp.status()
            );
            return Ok(None);
        }

        let odds: EventOdds = resp.json().await?;
        Ok(Some(odds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_odds_payload_parses() {
        let raw = r#"{
            "id": "abc123",
            "bookmakers": [
                {
                    "key": "fanduel",
                    "markets": [
                        {
                            "key": "player_anytime_td",
                            "outcomes": [
                                {"name": "Yes", "description": "Ja'Marr Chase", "price": -120},
                                {"name": "No", "description": "Ja'Marr Chase", "price": 100},
                                {"name": "Yes", "description": "Joe Mixon", "price": 1.83}
                            ]
                        }
                    ]
                }
            ]
        }"#;
        let odds: EventOdds = serde_json::from_str(raw).unwrap();
        assert_eq!(odds.bookmakers.len(), 1);
        let market = &odds.bookmakers[0].markets[0];
        assert_eq!(market.key, ANYTIME_TD_MARKET_KEY);
        assert_eq!(market.outcomes[0].price, Some(-120.0));
        assert_eq!(market.outcomes[2].price, Some(1.83));
    }

    #[test]
    fn test_event_missing_optional_fields_parses() {
        let raw = r#"{"id": "e1"}"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event.id, "e1");
        assert!(event.home_team.is_none());
    }
}
