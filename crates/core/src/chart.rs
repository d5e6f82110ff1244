// crates/core/src/chart.rs
//! Chart-series shaping for the five stats views. Pure transformations
//! over the in-memory event list; the colors match what the frontend
//! already styles its chart.js canvases with.

use chrono::{Datelike, NaiveDate, Timelike};

use crate::grouping::{DayCount, DayGroups};
use crate::jst::{jst_date, to_jst};
use crate::types::{ChartData, ChartMode, Dataset, SmokingEvent};

const COUNT_LABEL: &str = "本数";

/// Build the chart payload for one mode.
///
/// `selected_day` only matters for [`ChartMode::TimeOfDay`]; the daily
/// modes chart every day that has events, and the trend mode charts the
/// precomputed dense 30-day series. An empty event list yields zero-filled
/// series, never an empty payload.
pub fn chart_data(
    mode: ChartMode,
    selected_day: Option<NaiveDate>,
    events: &[SmokingEvent],
    groups: &DayGroups,
    last30: &[DayCount],
) -> ChartData {
    match mode {
        ChartMode::Trend => trend_chart(last30),
        ChartMode::TimeOfDay => time_of_day_chart(selected_day, events),
        ChartMode::DailyCount => daily_chart(
            groups,
            COUNT_LABEL,
            "rgba(75,192,192,0.6)",
            "rgba(75,192,192,1)",
            |bucket| bucket.len() as f64,
        ),
        ChartMode::DailyNicotine => daily_chart(
            groups,
            "ニコチン (mg)",
            "rgba(153,102,255,0.6)",
            "rgba(153,102,255,1)",
            |bucket| sum_linked(bucket, |c| c.nicotine),
        ),
        ChartMode::DailyTar => daily_chart(
            groups,
            "タール (mg)",
            "rgba(255,159,64,0.6)",
            "rgba(255,159,64,1)",
            |bucket| sum_linked(bucket, |c| c.tar),
        ),
    }
}

/// Per-day sum of a linked-cigarette field. Events with no linked
/// settings row contribute 0; the "current settings" fallback is
/// deliberately not applied here.
fn sum_linked(
    bucket: &[SmokingEvent],
    field: impl Fn(&crate::types::CigaretteSettings) -> f64,
) -> f64 {
    bucket
        .iter()
        .filter_map(|e| e.cigarette.as_ref())
        .map(field)
        .sum()
}

fn daily_chart(
    groups: &DayGroups,
    label: &str,
    background: &str,
    border: &str,
    value: impl Fn(&[SmokingEvent]) -> f64,
) -> ChartData {
    let labels = groups
        .keys()
        .map(|day| format!("{:02}/{:02}", day.month(), day.day()))
        .collect();
    let data = groups.values().map(|bucket| value(bucket)).collect();
    ChartData {
        labels,
        datasets: vec![Dataset::bar(label, data, background, border)],
    }
}

/// 24 hourly bins (midnight-start, JST) for one selected day.
fn time_of_day_chart(selected_day: Option<NaiveDate>, events: &[SmokingEvent]) -> ChartData {
    let mut bins = [0.0f64; 24];
    if let Some(day) = selected_day {
        for event in events {
            if jst_date(event.timestamp) == day {
                bins[to_jst(event.timestamp).hour() as usize] += 1.0;
            }
        }
    }
    ChartData {
        labels: (0..24).map(|h| format!("{h}時")).collect(),
        datasets: vec![Dataset::bar(
            COUNT_LABEL,
            bins.to_vec(),
            "rgba(54, 162, 235, 0.6)",
            "rgba(54, 162, 235, 1)",
        )],
    }
}

/// 30-day trend line, filled area, zero points kept so the series stays dense.
fn trend_chart(last30: &[DayCount]) -> ChartData {
    ChartData {
        labels: last30.iter().map(|p| p.date.to_string()).collect(),
        datasets: vec![Dataset {
            label: COUNT_LABEL.to_string(),
            data: last30.iter().map(|p| f64::from(p.count)).collect(),
            background_color: "rgba(75,192,192,0.2)".to_string(),
            border_color: "rgba(75,192,192,1)".to_string(),
            border_width: 1,
            fill: true,
        }],
    }
}
