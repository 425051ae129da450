//! Player roster resolution.
//!
//! Parses a semi-structured, line-oriented roster text into a normalized
//! player-name -> team-abbreviation table, built once at startup and shared
//! read-only across refreshes. Line shapes are tried strictest-first so a
//! line captured by an earlier pattern is never reprocessed by a looser one.

use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{info, warn};

use crate::error::Result;

/// Full "city + mascot" team names -> abbreviation, lowercase keys.
static TEAM_ABBR: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("arizona cardinals", "ARI"),
        ("atlanta falcons", "ATL"),
        ("baltimore ravens", "BAL"),
        ("buffalo bills", "BUF"),
        ("carolina panthers", "CAR"),
        ("chicago bears", "CHI"),
        ("cincinnati bengals", "CIN"),
        ("cleveland browns", "CLE"),
        ("dallas cowboys", "DAL"),
        ("denver broncos", "DEN"),
        ("detroit lions", "DET"),
        ("green bay packers", "GB"),
        ("houston texans", "HOU"),
        ("indianapolis colts", "IND"),
        ("jacksonville jaguars", "JAX"),
        ("kansas city chiefs", "KC"),
        ("los angeles rams", "LAR"),
        ("miami dolphins", "MIA"),
        ("minnesota vikings", "MIN"),
        ("new england patriots", "NE"),
        ("new orleans saints", "NO"),
        ("new york giants", "NYG"),
        ("new york jets", "NYJ"),
        ("las vegas raiders", "LV"),
        ("philadelphia eagles", "PHI"),
        ("pittsburgh steelers", "PIT"),
        ("los angeles chargers", "LAC"),
        ("san francisco 49ers", "SF"),
        ("seattle seahawks", "SEA"),
        ("tampa bay buccaneers", "TB"),
        ("tennessee titans", "TEN"),
        ("washington commanders", "WAS"),
    ])
});

/// Mascot-only labels ("bengals" -> "CIN"), derived from the full table.
/// NFL mascots are single tokens, so the last word of each full name is unique.
static MASCOT_ABBR: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    TEAM_ABBR
        .iter()
        .filter_map(|(full, abbr)| full.rsplit(' ').next().map(|mascot| (mascot, *abbr)))
        .collect()
});

/// Position tokens that may lead a roster line.
const POSITION_TOKENS: [&str; 9] = ["QB", "RB", "WR", "TE", "FB", "K", "D/ST", "DST", "DEF"];

// Line-shape patterns, strictest first. Team validity is checked against the
// label tables after capture, not inside the regex.
static RE_POS_NAME_COMMA_TEAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<pos>[A-Za-z]{1,3}(?:/[A-Za-z]{1,3})?)\s+(?P<name>[^,]+),\s*(?P<team>.+)$")
        .unwrap()
});
static RE_POS_REST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<pos>[A-Za-z]{1,3}(?:/[A-Za-z]{1,3})?)\s+(?P<rest>.+)$").unwrap()
});
static RE_NAME_COMMA_TEAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<name>[^,]+),\s*(?P<team>.+)$").unwrap());

/// Outcome of matching a single roster line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineMatch {
    /// A player entry: raw name plus resolved team abbreviation
    Entry { name: String, team: &'static str },
    /// Recognized but deliberately skipped (team-defense / kicker-style line)
    Excluded,
}

/// Normalize a player name for lookup: lowercase, strip periods and commas,
/// collapse whitespace. Apostrophes are kept so possessive-marked names stay
/// distinct.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .replace(['.', ','], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a free-text team label against the full table, then the
/// mascot-only table.
fn resolve_team_label(label: &str) -> Option<&'static str> {
    let key = label.trim().trim_end_matches('.').to_lowercase();
    TEAM_ABBR
        .get(key.as_str())
        .or_else(|| MASCOT_ABBR.get(key.as_str()))
        .copied()
}

/// Resolve a full "city + mascot" name to its abbreviation, falling back to
/// the name itself when unknown. Used for fixture home/away labels.
pub fn team_abbreviation(full_name: &str) -> String {
    resolve_team_label(full_name)
        .map(|abbr| abbr.to_string())
        .unwrap_or_else(|| full_name.to_string())
}

fn is_position_token(token: &str) -> bool {
    POSITION_TOKENS
        .iter()
        .any(|p| p.eq_ignore_ascii_case(token))
}

/// Shape 1: `<position> <name>, <team>`
fn match_pos_name_comma_team(line: &str) -> Option<LineMatch> {
    let caps = RE_POS_NAME_COMMA_TEAM.captures(line)?;
    if !is_position_token(&caps["pos"]) {
        return None;
    }
    let team = resolve_team_label(&caps["team"])?;
    let name = caps["name"].trim().to_string();
    if resolve_team_label(&name).is_some() {
        // "D/ST Baltimore Ravens, BAL" and the like
        return Some(LineMatch::Excluded);
    }
    Some(LineMatch::Entry { name, team })
}

/// Shape 2: `<position> <name> <team>` — no comma. The team is the longest
/// known-label suffix of the remainder; what precedes it is the name.
fn match_pos_name_team(line: &str) -> Option<LineMatch> {
    let caps = RE_POS_REST.captures(line)?;
    if !is_position_token(&caps["pos"]) {
        return None;
    }
    let tokens: Vec<&str> = caps["rest"].split_whitespace().collect();
    for take in (1..=tokens.len()).rev() {
        let split = tokens.len() - take;
        let label = tokens[split..].join(" ");
        if let Some(team) = resolve_team_label(&label) {
            if split == 0 {
                // The whole remainder is a team label: a defense/kicker line
                return Some(LineMatch::Excluded);
            }
            return Some(LineMatch::Entry {
                name: tokens[..split].join(" "),
                team,
            });
        }
    }
    None
}

/// Shape 3: `<name>, <team>` — no position token.
fn match_name_comma_team(line: &str) -> Option<LineMatch> {
    let caps = RE_NAME_COMMA_TEAM.captures(line)?;
    let team = resolve_team_label(&caps["team"])?;
    let name = caps["name"].trim().to_string();
    if resolve_team_label(&name).is_some() {
        return Some(LineMatch::Excluded);
    }
    Some(LineMatch::Entry { name, team })
}

/// Match one roster line against the shape patterns in precedence order.
fn match_line(line: &str) -> Option<LineMatch> {
    match_pos_name_comma_team(line)
        .or_else(|| match_pos_name_team(line))
        .or_else(|| match_name_comma_team(line))
}

/// Immutable normalized-name -> team-abbreviation lookup table.
#[derive(Debug, Default)]
pub struct RosterIndex {
    entries: HashMap<String, &'static str>,
}

impl RosterIndex {
    /// Build the index from roster reference text. Unparseable lines are
    /// skipped silently; they are headers, separators, or noise.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(LineMatch::Entry { name, team }) = match_line(line) {
                entries.insert(normalize_name(&name), team);
            }
        }
        Self { entries }
    }

    /// Load and parse the roster file at `path`. A missing or unset path
    /// yields an empty index: every player resolves as unknown and the
    /// configured fallback policy applies.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) if Path::new(p).exists() => {
                let text = std::fs::read_to_string(p)?;
                let index = Self::parse(&text);
                info!("Loaded {} roster entries from {}", index.len(), p);
                Ok(index)
            }
            Some(p) => {
                warn!("Roster file {} not found; players will be unresolved", p);
                Ok(Self::default())
            }
            None => {
                warn!("No roster path configured; players will be unresolved");
                Ok(Self::default())
            }
        }
    }

    /// Look up a free-text player name. Absence is never an error.
    pub fn lookup(&self, player_name: &str) -> Option<&'static str> {
        self.entries.get(&normalize_name(player_name)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A deterministic sample of entries for diagnostics.
    pub fn sample(&self, n: usize) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = self
            .entries
            .iter()
            .map(|(name, team)| (name.clone(), team.to_string()))
            .collect();
        pairs.sort();
        pairs.truncate(n);
        pairs
    }
}
