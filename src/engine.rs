//! Bookmaker/market selection and the per-outcome adjustment engine.
//!
//! One fixture in, adjusted outcomes out. Everything here is pure over the
//! already-fetched payloads; the refresh pipeline owns the network.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::adapters::{Bookmaker, Event, EventOdds, Market, Outcome, TeamBoosts, ANYTIME_TD_MARKET_KEY};
use crate::domain::odds::{
    american_to_probability, clamp_adjusted, decimal_to_american, probability_to_american,
    PriceFormat,
};
use crate::domain::snapshot::{round1, round2, round4, AdjustedOutcome, AdjustedQuote, BookQuote, Edge};
use crate::roster::{team_abbreviation, RosterIndex};

/// Sentinel team for players the roster cannot place.
pub const UNRESOLVED_TEAM: &str = "TBD";

/// Multiplier policy for outcomes whose player team cannot be resolved.
/// Fixed per deployment, not per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTeamPolicy {
    /// No boost: multiplier 1.0
    #[default]
    NoBoost,
    /// Mean of the fixture's home and away boosts
    Average,
    /// Force the home side's boost
    Home,
    /// Force the away side's boost
    Away,
}

impl UnknownTeamPolicy {
    fn lift(&self, lift_home: f64, lift_away: f64) -> f64 {
        match self {
            Self::NoBoost => 1.0,
            Self::Average => (lift_home + lift_away) / 2.0,
            Self::Home => lift_home,
            Self::Away => lift_away,
        }
    }
}

/// Pick the bookmaker to trust for one fixture: priority-ordered, first
/// match wins. None when no preferred bookmaker quotes the fixture.
pub fn select_bookmaker<'a>(odds: &'a EventOdds, priority: &[String]) -> Option<&'a Bookmaker> {
    priority
        .iter()
        .find_map(|preferred| odds.bookmakers.iter().find(|b| &b.key == preferred))
}

/// Locate the anytime-TD market within the chosen bookmaker.
pub fn anytime_td_market(bookmaker: &Bookmaker) -> Option<&Market> {
    bookmaker.markets.iter().find(|m| m.key == ANYTIME_TD_MARKET_KEY)
}

/// Book-implied probability and canonical American odds for a raw price.
/// The format is inferred from magnitude (strictly inside (1, 10) reads as
/// decimal; American magnitudes are always >= 100, so the boundary is safe).
fn book_quote_from_price(raw: f64) -> Option<(i64, f64)> {
    match PriceFormat::classify(raw) {
        PriceFormat::Decimal => Some((decimal_to_american(raw), 1.0 / raw)),
        PriceFormat::American => {
            let odds = raw.round();
            let prob = american_to_probability(odds).ok()?;
            Some((odds as i64, prob))
        }
    }
}

/// Compute adjusted outcomes for one fixture's already-selected market.
pub fn process_event(
    event: &Event,
    odds: &EventOdds,
    boosts: &TeamBoosts,
    roster: &RosterIndex,
    policy: UnknownTeamPolicy,
    priority: &[String],
) -> Vec<AdjustedOutcome> {
    let mut results = Vec::new();

    let home_abbr = event
        .home_team
        .as_deref()
        .map(team_abbreviation)
        .unwrap_or_else(|| "HOME".to_string());
    let away_abbr = event
        .away_team
        .as_deref()
        .map(team_abbreviation)
        .unwrap_or_else(|| "AWAY".to_string());

    let Some(bookmaker) = select_bookmaker(odds, priority) else {
        return results;
    };
    let Some(market) = anytime_td_market(bookmaker) else {
        return results;
    };

    let lift_home = boosts.get(&home_abbr).copied().unwrap_or(1.0);
    let lift_away = boosts.get(&away_abbr).copied().unwrap_or(1.0);
    let game = format!("{} @ {}", away_abbr, home_abbr);

    for outcome in &market.outcomes {
        if let Some(adjusted) = adjust_outcome(
            outcome,
            &game,
            event.commence_time.clone(),
            &bookmaker.key,
            &home_abbr,
            &away_abbr,
            lift_home,
            lift_away,
            roster,
            policy,
        ) {
            results.push(adjusted);
        }
    }

    results
}

#[allow(clippy::too_many_arguments)]
fn adjust_outcome(
    outcome: &Outcome,
    game: &str,
    commence_time: Option<String>,
    bookmaker_key: &str,
    home_abbr: &str,
    away_abbr: &str,
    lift_home: f64,
    lift_away: f64,
    roster: &RosterIndex,
    policy: UnknownTeamPolicy,
) -> Option<AdjustedOutcome> {
    // Only priced "Yes" selections carry a usable quote
    if outcome.name != "Yes" {
        return None;
    }
    let player_name = outcome.description.as_deref()?.trim();
    if player_name.is_empty() {
        return None;
    }
    let raw_price = outcome.price?;

    // A malformed price (zero American odds) rejects this single outcome
    let (book_odds_american, book_prob) = book_quote_from_price(raw_price)?;

    let player_team = roster.lookup(player_name);
    let lift = match player_team {
        Some(team) if team == home_abbr => lift_home,
        Some(team) if team == away_abbr => lift_away,
        _ => policy.lift(lift_home, lift_away),
    };

    let adj_prob = clamp_adjusted(book_prob * lift);
    let fair_odds = probability_to_american(adj_prob);
    let edge_pp = adj_prob - book_prob;
    let edge_rel = if book_prob > 0.0 {
        Some(edge_pp / book_prob * 100.0)
    } else {
        None
    };

    trace!(
        player = player_name,
        team = player_team.unwrap_or(UNRESOLVED_TEAM),
        lift,
        "adjusted outcome"
    );

    Some(AdjustedOutcome {
        player_name: player_name.to_string(),
        team: player_team.unwrap_or(UNRESOLVED_TEAM).to_string(),
        game: game.to_string(),
        commence_time,
        bookmaker: bookmaker_key.to_string(),
        book: BookQuote {
            odds_american: book_odds_american,
            implied_probability: round4(book_prob),
            implied_probability_pct: round1(book_prob * 100.0),
        },
        adjusted: AdjustedQuote {
            team_lift: round4(lift),
            probability: round4(adj_prob),
            probability_pct: round1(adj_prob * 100.0),
            fair_odds_american: fair_odds,
        },
        edge: Edge {
            probability_points: round4(edge_pp),
            probability_points_pct: round2(edge_pp * 100.0),
            relative_uplift_pct: edge_rel.map(round2),
        },
    })
}
