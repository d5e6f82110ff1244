// crates/core/src/jst.rs
//! JST (UTC+9) conversions. The user base is Japanese-locale, so every
//! day and hour bucket in the app is computed against this fixed offset,
//! never against the server's local timezone.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Seconds east of UTC for Japan Standard Time.
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// The fixed JST offset. chrono guarantees the construction is valid.
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

/// Convert a UTC instant to its JST wall-clock representation.
pub fn to_jst(ts: DateTime<Utc>) -> DateTime<FixedOffset> {
    ts.with_timezone(&jst())
}

/// The JST calendar date an instant falls on. Day boundary is 00:00 JST.
pub fn jst_date(ts: DateTime<Utc>) -> NaiveDate {
    to_jst(ts).date_naive()
}

/// Today's date in JST.
pub fn jst_today() -> NaiveDate {
    jst_date(Utc::now())
}
