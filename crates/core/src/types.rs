// crates/core/src/types.rs
//! Shared data model for smoking events, cigarette settings, and chart output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single logged cigarette. Immutable once written; there is no delete path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmokingEvent {
    pub id: i64,
    /// Instant of smoking, stored in UTC. All bucketing converts to JST.
    pub timestamp: DateTime<Utc>,
    /// Settings row that was current when the event was logged.
    /// `None` for rows written before per-event linking existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cigarette_id: Option<i64>,
    /// Display-time join of the linked settings row, filled by the list query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cigarette: Option<CigaretteSettings>,
}

/// A cigarette product profile. Every save creates a new row; the most
/// recently created row is the authoritative "latest settings".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CigaretteSettings {
    pub id: i64,
    pub brand: String,
    /// Tar per cigarette in mg. 0 when the user left it blank.
    pub tar: f64,
    /// Nicotine per cigarette in mg. 0 when the user left it blank.
    pub nicotine: f64,
}

/// Which chart the stats view is asking for.
///
/// Closed set; anything the client sends outside it falls back to
/// [`ChartMode::DailyCount`] rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    #[default]
    DailyCount,
    DailyNicotine,
    DailyTar,
    TimeOfDay,
    Trend,
}

impl ChartMode {
    /// Parse a query-string value, falling back to `DailyCount` for
    /// unknown modes.
    pub fn from_param(s: &str) -> Self {
        match s {
            "daily_nicotine" => Self::DailyNicotine,
            "daily_tar" => Self::DailyTar,
            "time_of_day" => Self::TimeOfDay,
            "trend" => Self::Trend,
            _ => Self::DailyCount,
        }
    }
}

/// Chart.js-shaped payload: one label per x-axis position, one dataset
/// covering all positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// One chart.js dataset with the styling the frontend expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: String,
    pub border_color: String,
    pub border_width: u32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fill: bool,
}

impl Dataset {
    pub fn bar(label: &str, data: Vec<f64>, background: &str, border: &str) -> Self {
        Self {
            label: label.to_string(),
            data,
            background_color: background.to_string(),
            border_color: border.to_string(),
            border_width: 1,
            fill: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_mode_from_param() {
        assert_eq!(ChartMode::from_param("trend"), ChartMode::Trend);
        assert_eq!(ChartMode::from_param("time_of_day"), ChartMode::TimeOfDay);
        assert_eq!(ChartMode::from_param("daily_tar"), ChartMode::DailyTar);
        // Unknown modes fall back to the default chart
        assert_eq!(ChartMode::from_param("bogus"), ChartMode::DailyCount);
        assert_eq!(ChartMode::from_param(""), ChartMode::DailyCount);
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = SmokingEvent {
            id: 1,
            timestamp: "2024-03-01T05:30:00Z".parse().unwrap(),
            cigarette_id: Some(2),
            cigarette: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"cigaretteId\":2"));
        assert!(!json.contains("cigarette_id"));
        assert!(!json.contains("\"cigarette\":"));
    }

    #[test]
    fn test_event_deserializes_without_link() {
        let event: SmokingEvent =
            serde_json::from_str(r#"{"id":7,"timestamp":"2024-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(event.cigarette_id, None);
        assert_eq!(event.cigarette, None);
    }
}
