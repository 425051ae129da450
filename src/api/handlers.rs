use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::api::state::AppState;
use crate::domain::Snapshot;

fn now_utc_str() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// GET / — service description and active configuration. The credential is
/// never echoed.
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": "Anytime TD Adjusted Odds",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/anytime-td-adjusted": {
                "GET": "Return adjusted anytime TD odds (cached or refreshed if stale)."
            },
            "/refresh": {
                "POST": "Force refresh of team projections and anytime TD odds."
            },
            "/roster-stats": {
                "GET": "Count and sample of resolved roster entries."
            },
            "/health": {
                "GET": "Health check."
            }
        },
        "config": {
            "team_projections_url": state.config.projections.url.clone(),
            "odds_base_url": state.config.odds.base_url.clone(),
            "bookmaker_priority": state.config.odds.bookmaker_priority.clone(),
            "cache_ttl_secs": state.config.cache.ttl_secs,
            "unknown_team_policy": state.config.engine.unknown_team_policy,
        },
        "timestamp": now_utc_str(),
    }))
}

/// GET /health — liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": now_utc_str(),
    }))
}

/// GET /anytime-td-adjusted — current or freshly computed snapshot
pub async fn anytime_td_adjusted(
    State(state): State<AppState>,
) -> Result<Json<Snapshot>, (StatusCode, Json<Value>)> {
    let snapshot = state
        .cache
        .get_or_refresh(state.pipeline.as_ref())
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
        })?;
    Ok(Json(snapshot.as_ref().clone()))
}

/// POST /refresh — forced synchronous refresh
pub async fn refresh(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let snapshot = state
        .cache
        .force_refresh(state.pipeline.as_ref())
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": e.to_string()})),
            )
        })?;
    Ok(Json(json!({
        "status": "success",
        "analysis_date": snapshot.analysis_date.clone(),
        "summary": snapshot.summary.clone(),
    })))
}

/// GET /roster-stats — diagnostic view of the roster index
pub async fn roster_stats(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "entries": state.roster.len(),
        "sample": state.roster.sample(10),
    }))
}
