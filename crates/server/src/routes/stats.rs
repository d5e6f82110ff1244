// crates/server/src/routes/stats.rs
//! Server-side aggregation endpoints: chart payloads for the stats tab
//! and the time-since-last-cigarette milestone display.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use kemuri_core::{
    chart_data, current_milestone, group_events_by_day, jst::jst_today, last_30_days,
    next_milestone, time_since, ChartData, ChartMode, HealthMilestone, TimeSince,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ChartQuery {
    /// One of the five chart modes; anything else falls back to daily_count.
    pub mode: Option<String>,
    /// Selected day for the time-of-day chart, `YYYY-MM-DD` (JST).
    pub day: Option<String>,
}

/// GET /api/stats/chart - Chart payload for one mode.
async fn get_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Json<ChartData>> {
    let mode = query
        .mode
        .as_deref()
        .map(ChartMode::from_param)
        .unwrap_or_default();
    let selected_day = query.day.as_deref().map(parse_day).transpose()?;

    let events = state.db.list_events().await?;
    let groups = group_events_by_day(&events);
    let last30 = last_30_days(&groups, jst_today());
    // Default the time-of-day view to the most recent day that has data.
    let selected_day = selected_day.or_else(|| groups.keys().next_back().copied());

    Ok(Json(chart_data(mode, selected_day, &events, &groups, &last30)))
}

fn parse_day(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation(format!("Invalid day '{raw}', expected YYYY-MM-DD")))
}

/// Health milestone view: what has been reached, what comes next.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatsResponse {
    /// `None` when no events are recorded yet; the UI hides the panel.
    pub last_smoked_at: Option<DateTime<Utc>>,
    pub elapsed: Option<TimeSince>,
    pub current: Option<MilestoneView>,
    pub next: Option<MilestoneView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneView {
    pub hours: i64,
    pub benefit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_remaining: Option<i64>,
}

impl MilestoneView {
    fn reached(m: &HealthMilestone) -> Self {
        Self {
            hours: m.hours,
            benefit: m.benefit.to_string(),
            hours_remaining: None,
        }
    }

    fn upcoming(m: &HealthMilestone, remaining: i64) -> Self {
        Self {
            hours: m.hours,
            benefit: m.benefit.to_string(),
            hours_remaining: Some(remaining),
        }
    }
}

/// GET /api/stats/health - Time since the last cigarette plus the health
/// milestones around it.
async fn get_health_stats(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<HealthStatsResponse>> {
    let events = state.db.list_events().await?;
    let Some(last) = events.first() else {
        return Ok(Json(HealthStatsResponse {
            last_smoked_at: None,
            elapsed: None,
            current: None,
            next: None,
        }));
    };

    let elapsed = time_since(last.timestamp, Utc::now());
    Ok(Json(HealthStatsResponse {
        last_smoked_at: Some(last.timestamp),
        elapsed: Some(elapsed),
        current: current_milestone(elapsed).map(MilestoneView::reached),
        next: next_milestone(elapsed).map(|(m, remaining)| MilestoneView::upcoming(m, remaining)),
    }))
}

/// Create the stats routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stats/chart", get(get_chart))
        .route("/stats/health", get(get_health_stats))
}
