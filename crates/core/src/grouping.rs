// crates/core/src/grouping.rs
//! Calendar-day bucketing of smoking events and the dense 30-day trend
//! series built on top of it.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::jst::jst_date;
use crate::types::SmokingEvent;

/// Events keyed by the JST calendar day they fall on. BTreeMap keeps the
/// keys in ascending date order, which is the order the daily charts use.
pub type DayGroups = BTreeMap<NaiveDate, Vec<SmokingEvent>>;

/// One point of the 30-day trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u32,
}

/// Bucket events by JST calendar day (00:00 JST boundary).
///
/// Every event lands in exactly one bucket; re-grouping a bucket's
/// contents yields the same single bucket back.
pub fn group_events_by_day(events: &[SmokingEvent]) -> DayGroups {
    let mut groups = DayGroups::new();
    for event in events {
        groups
            .entry(jst_date(event.timestamp))
            .or_default()
            .push(event.clone());
    }
    groups
}

/// Dense 30-point series ending on `today`, one point per calendar day,
/// oldest first. Days with no events get an explicit zero.
pub fn last_30_days(groups: &DayGroups, today: NaiveDate) -> Vec<DayCount> {
    (0..30)
        .rev()
        .map(|back| {
            let date = today - Days::new(back);
            let count = groups.get(&date).map_or(0, |events| events.len() as u32);
            DayCount { date, count }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    fn event(id: i64, ts: &str) -> SmokingEvent {
        SmokingEvent {
            id,
            timestamp: ts.parse::<DateTime<Utc>>().unwrap(),
            cigarette_id: None,
            cigarette: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_grouping_crosses_utc_midnight_into_one_jst_day() {
        // Both instants are past 00:00 JST on Jan 2 (08:00 and 10:00 JST),
        // so they share a bucket even though they straddle UTC midnight.
        let events = vec![
            event(1, "2024-01-01T23:00:00Z"),
            event(2, "2024-01-02T01:00:00Z"),
        ];
        let groups = group_events_by_day(&events);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[&date("2024-01-02")].len(), 2);
    }

    #[test]
    fn test_grouping_partitions_input_exactly() {
        let events = vec![
            event(1, "2024-02-01T03:00:00Z"),
            event(2, "2024-02-01T16:00:00Z"), // 01:00 JST Feb 2
            event(3, "2024-02-02T03:00:00Z"),
            event(4, "2024-02-05T12:00:00Z"),
        ];
        let groups = group_events_by_day(&events);
        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, events.len());

        let mut seen: Vec<i64> = groups
            .values()
            .flat_map(|bucket| bucket.iter().map(|e| e.id))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let events = vec![
            event(1, "2024-02-01T03:00:00Z"),
            event(2, "2024-02-01T04:00:00Z"),
        ];
        let groups = group_events_by_day(&events);
        for (day, bucket) in &groups {
            let regrouped = group_events_by_day(bucket);
            assert_eq!(regrouped.len(), 1);
            assert_eq!(&regrouped[day], bucket);
        }
    }

    #[test]
    fn test_grouping_empty_input() {
        assert!(group_events_by_day(&[]).is_empty());
    }

    #[test]
    fn test_last_30_days_is_dense() {
        let events = vec![
            event(1, "2024-03-09T23:30:00Z"), // Mar 10 JST
            event(2, "2024-03-10T01:00:00Z"), // Mar 10 JST
            event(3, "2024-03-14T03:00:00Z"), // Mar 14 JST
        ];
        let groups = group_events_by_day(&events);
        let series = last_30_days(&groups, date("2024-03-15"));

        assert_eq!(series.len(), 30);
        assert_eq!(series.first().unwrap().date, date("2024-02-15"));
        assert_eq!(series.last().unwrap().date, date("2024-03-15"));
        // No gaps: consecutive dates throughout
        for pair in series.windows(2) {
            assert_eq!(pair[1].date, pair[0].date + Days::new(1));
        }

        let total: u32 = series.iter().map(|p| p.count).sum();
        assert_eq!(total, 3);
        assert_eq!(
            series.iter().find(|p| p.date == date("2024-03-10")).unwrap().count,
            2
        );
    }

    #[test]
    fn test_last_30_days_excludes_out_of_window_events() {
        let events = vec![event(1, "2023-12-01T03:00:00Z")];
        let groups = group_events_by_day(&events);
        let series = last_30_days(&groups, date("2024-03-15"));
        assert_eq!(series.len(), 30);
        assert!(series.iter().all(|p| p.count == 0));
    }
}
