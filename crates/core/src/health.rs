// crates/core/src/health.rs
//! Time-since-last-cigarette tracking against the post-quit health
//! improvement timeline shown on the record tab.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One step of the health improvement timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMilestone {
    /// Hours of abstinence at which the benefit kicks in.
    pub hours: i64,
    pub benefit: &'static str,
}

/// Post-quit health improvement timeline, ascending.
pub const HEALTH_MILESTONES: &[HealthMilestone] = &[
    HealthMilestone { hours: 1, benefit: "心拍数と血圧が正常に戻り始めます" },
    HealthMilestone { hours: 12, benefit: "血液中の一酸化炭素レベルが正常値に戻ります" },
    HealthMilestone { hours: 24, benefit: "心臓発作のリスクが減少し始めます" },
    HealthMilestone { hours: 48, benefit: "味覚と嗅覚が改善し始めます" },
    HealthMilestone { hours: 72, benefit: "気管支が緩み、呼吸が楽になります" },
    HealthMilestone { hours: 14 * 24, benefit: "肺機能が向上し、循環が改善します" },
    HealthMilestone { hours: 30 * 24, benefit: "咳や息切れが減少します" },
    HealthMilestone { hours: 90 * 24, benefit: "肺の自浄作用が回復します" },
    HealthMilestone { hours: 365 * 24, benefit: "冠状動脈疾患のリスクが半減します" },
];

/// Elapsed time since the last cigarette, split the way the UI displays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSince {
    pub days: i64,
    /// Hours past the full days (0..24).
    pub hours: i64,
    pub total_hours: i64,
}

/// Elapsed time between the last cigarette and `now`. Returns zeros if the
/// clock went backwards.
pub fn time_since(last: DateTime<Utc>, now: DateTime<Utc>) -> TimeSince {
    let total_hours = (now - last).num_hours().max(0);
    TimeSince {
        days: total_hours / 24,
        hours: total_hours % 24,
        total_hours,
    }
}

/// The latest milestone already reached, if any.
pub fn current_milestone(elapsed: TimeSince) -> Option<&'static HealthMilestone> {
    HEALTH_MILESTONES
        .iter()
        .rev()
        .find(|m| elapsed.total_hours >= m.hours)
}

/// The next milestone still ahead, with hours remaining until it.
pub fn next_milestone(elapsed: TimeSince) -> Option<(&'static HealthMilestone, i64)> {
    HEALTH_MILESTONES
        .iter()
        .find(|m| elapsed.total_hours < m.hours)
        .map(|m| (m, m.hours - elapsed.total_hours))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_time_since_splits_days_and_hours() {
        let elapsed = time_since(ts("2024-01-01T00:00:00Z"), ts("2024-01-03T05:00:00Z"));
        assert_eq!(elapsed.days, 2);
        assert_eq!(elapsed.hours, 5);
        assert_eq!(elapsed.total_hours, 53);
    }

    #[test]
    fn test_time_since_clock_skew_clamps_to_zero() {
        let elapsed = time_since(ts("2024-01-02T00:00:00Z"), ts("2024-01-01T00:00:00Z"));
        assert_eq!(elapsed.total_hours, 0);
    }

    #[test]
    fn test_milestones_just_started() {
        let elapsed = time_since(ts("2024-01-01T00:00:00Z"), ts("2024-01-01T00:30:00Z"));
        assert_eq!(current_milestone(elapsed), None);
        let (next, remaining) = next_milestone(elapsed).unwrap();
        assert_eq!(next.hours, 1);
        assert_eq!(remaining, 1);
    }

    #[test]
    fn test_milestones_mid_timeline() {
        // 53 hours in: past the 48h milestone, 19h short of the 72h one.
        let elapsed = time_since(ts("2024-01-01T00:00:00Z"), ts("2024-01-03T05:00:00Z"));
        assert_eq!(current_milestone(elapsed).unwrap().hours, 48);
        let (next, remaining) = next_milestone(elapsed).unwrap();
        assert_eq!(next.hours, 72);
        assert_eq!(remaining, 19);
    }

    #[test]
    fn test_milestones_all_achieved() {
        let elapsed = time_since(ts("2022-01-01T00:00:00Z"), ts("2024-01-01T00:00:00Z"));
        assert_eq!(current_milestone(elapsed).unwrap().hours, 365 * 24);
        assert_eq!(next_milestone(elapsed), None);
    }

    #[test]
    fn test_milestone_table_is_ascending() {
        for pair in HEALTH_MILESTONES.windows(2) {
            assert!(pair[0].hours < pair[1].hours);
        }
    }
}
