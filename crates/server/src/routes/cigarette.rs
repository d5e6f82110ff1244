// crates/server/src/routes/cigarette.rs
//! Cigarette settings endpoints: read the latest product profile, append
//! a new one.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Latest settings, or the empty defaults the frontend renders before
/// first setup (`brand: ""`, zeros, no id).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CigaretteResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub brand: String,
    pub tar: f64,
    pub nicotine: f64,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
}

/// GET /api/cigarette - Latest settings row or empty-shaped defaults.
async fn get_cigarette(State(state): State<Arc<AppState>>) -> ApiResult<Json<CigaretteResponse>> {
    let latest = state.db.latest_cigarette().await?;
    Ok(Json(match latest {
        Some(s) => CigaretteResponse {
            id: Some(s.id),
            brand: s.brand,
            tar: s.tar,
            nicotine: s.nicotine,
        },
        None => CigaretteResponse {
            id: None,
            brand: String::new(),
            tar: 0.0,
            nicotine: 0.0,
        },
    }))
}

/// POST /api/cigarette - Append a new settings row.
///
/// The body is validated by hand so malformed shapes come back as the
/// structured 400 the frontend expects: `brand` must be a non-empty
/// string; `tar`/`nicotine` default to 0 when absent or null.
async fn post_cigarette(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<SaveResponse>> {
    let brand = body
        .get("brand")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::Validation("brand must be a string".to_string()))?;
    if brand.trim().is_empty() {
        return Err(ApiError::Validation("brand must not be empty".to_string()));
    }

    let tar = numeric_field(&body, "tar")?;
    let nicotine = numeric_field(&body, "nicotine")?;

    state.db.create_cigarette(brand, tar, nicotine).await?;
    Ok(Json(SaveResponse { success: true }))
}

fn numeric_field(body: &Value, key: &str) -> ApiResult<f64> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(0.0),
        Some(v) => v
            .as_f64()
            .ok_or_else(|| ApiError::Validation(format!("{key} must be a number"))),
    }
}

/// Create the cigarette routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/cigarette", get(get_cigarette).post(post_cigarette))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_field_defaults() {
        let body: Value = serde_json::json!({ "brand": "メビウス", "tar": null });
        assert_eq!(numeric_field(&body, "tar").unwrap(), 0.0);
        assert_eq!(numeric_field(&body, "nicotine").unwrap(), 0.0);
    }

    #[test]
    fn test_numeric_field_rejects_strings() {
        let body: Value = serde_json::json!({ "tar": "14" });
        assert!(numeric_field(&body, "tar").is_err());
    }

    #[test]
    fn test_empty_response_shape() {
        let response = CigaretteResponse {
            id: None,
            brand: String::new(),
            tar: 0.0,
            nicotine: 0.0,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(json.contains("\"brand\":\"\""));
    }
}
