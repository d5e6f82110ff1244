// crates/server/src/routes/smoking.rs
//! Smoking event endpoints: list, record (single or bulk), backfill
//! settings links, and CSV/JSON export.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use kemuri_core::jst::jst;
use kemuri_core::SmokingEvent;
use kemuri_db::{csv_store, NewEvent};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub success: bool,
    /// Number of events written.
    pub created: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillResponse {
    pub success: bool,
    pub message: String,
    pub cigarette_id: i64,
}

/// Export format query parameter.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ExportQuery {
    /// Export format: "json" (default) or "csv".
    pub format: Option<String>,
}

/// GET /api/smoking - All events, newest first, settings row joined in.
async fn list_smoking(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<SmokingEvent>>> {
    Ok(Json(state.db.list_events().await?))
}

/// POST /api/smoking - Record events.
///
/// Accepts either a single `{timestamp, cigaretteId?}` or the legacy bulk
/// shape `{events: [{timestamp}, ...]}`. The bulk path writes one
/// transaction: all rows land or none do. A single record without an
/// explicit `cigaretteId` is linked to the latest settings row, snapshotting
/// the product that was current at log time; bulk-imported history stays
/// unlinked until the backfill endpoint runs.
async fn post_smoking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<RecordResponse>> {
    if let Some(events_val) = body.get("events") {
        let items = events_val
            .as_array()
            .ok_or_else(|| ApiError::Validation("events must be an array".to_string()))?;
        let batch = items
            .iter()
            .map(parse_new_event)
            .collect::<ApiResult<Vec<_>>>()?;
        let created = state.db.create_events_bulk(&batch).await?;
        return Ok(Json(RecordResponse {
            success: true,
            created,
        }));
    }

    let mut event = parse_new_event(&body)?;
    if event.cigarette_id.is_none() {
        event.cigarette_id = state.db.latest_cigarette().await?.map(|c| c.id);
    }
    let created = state.db.create_event(event).await?;

    // Best-effort: a webhook failure must never fail the write.
    if let Some(notifier) = &state.notifier {
        if let Err(e) = notifier.send_smoked(created.timestamp).await {
            tracing::warn!(error = %e, "Notification send failed (non-fatal)");
        }
    }

    Ok(Json(RecordResponse {
        success: true,
        created: 1,
    }))
}

/// PUT /api/smoking - Link every unlinked event to the latest settings row.
///
/// 404 when no settings row exists yet.
async fn put_smoking(State(state): State<Arc<AppState>>) -> ApiResult<Json<BackfillResponse>> {
    let latest = state
        .db
        .latest_cigarette()
        .await?
        .ok_or_else(|| ApiError::NotFound("cigarette settings".to_string()))?;
    let updated = state.db.backfill_event_cigarettes(latest.id).await?;
    Ok(Json(BackfillResponse {
        success: true,
        message: format!("{updated}件のイベントを更新しました"),
        cigarette_id: latest.id,
    }))
}

/// GET /api/smoking/export - Export all events.
///
/// `format=csv` uses the legacy flat-file layout (header `timestamp`,
/// one instant per row); the default is the JSON list the GET endpoint
/// serves.
async fn export_smoking(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Response> {
    let format = query.format.unwrap_or_else(|| "json".to_string());
    if format != "json" && format != "csv" {
        return Err(ApiError::Validation(format!(
            "Invalid format '{format}'. Valid options: json, csv"
        )));
    }

    let events = state.db.list_events().await?;
    match format.as_str() {
        "csv" => {
            let mut buf = Vec::new();
            csv_store::write_events(&mut buf, &events)
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"smoking-events.csv\"",
                    ),
                ],
                buf,
            )
                .into_response())
        }
        _ => Ok(Json(events).into_response()),
    }
}

/// Parse one event object from a request body.
fn parse_new_event(v: &Value) -> ApiResult<NewEvent> {
    let raw = v
        .get("timestamp")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::Validation("timestamp must be a string".to_string()))?;
    let timestamp = parse_timestamp(raw)?;
    let cigarette_id = match v.get("cigaretteId") {
        None | Some(Value::Null) => None,
        Some(id) => Some(
            id.as_i64()
                .ok_or_else(|| ApiError::Validation("cigaretteId must be an integer".to_string()))?,
        ),
    };
    Ok(NewEvent {
        timestamp,
        cigarette_id,
    })
}

/// Accept the timestamp shapes the frontend actually sends: RFC 3339,
/// the offset-less `datetime-local` input value (read as JST wall clock),
/// and the bare dates of the bulk-import textarea (midnight JST).
fn parse_timestamp(raw: &str) -> ApiResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|d| NaiveDateTime::new(d, NaiveTime::MIN))
        })
        .map_err(|_| ApiError::Validation(format!("Invalid timestamp '{raw}'")))?;
    match naive.and_local_timezone(jst()) {
        chrono::LocalResult::Single(ts) => Ok(ts.with_timezone(&Utc)),
        _ => Err(ApiError::Validation(format!("Invalid timestamp '{raw}'"))),
    }
}

/// Create the smoking routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/smoking",
            get(list_smoking).post(post_smoking).put(put_smoking),
        )
        .route("/smoking/export", get(export_smoking))
}
