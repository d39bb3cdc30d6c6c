// src/utils/time.rs

//! JST date handling and timestamp formatting.
//!
//! The source site prints local Japanese times. Japan has no daylight
//! saving, so JST is a fixed UTC+9 offset; it is still kept as a named
//! constant rather than inline arithmetic.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

use crate::error::{AppError, Result};

/// JST offset from UTC, in seconds.
pub const JST_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// Date format used on the index page, e.g. `2024/03/15 14:30`.
const INDEX_DATE_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Japan Standard Time as a fixed offset.
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_UTC_OFFSET_SECS).expect("JST offset is within +/-24h")
}

/// Parse a `YYYY/MM/DD HH:mm` string as JST and convert to UTC.
pub fn parse_jst_datetime(input: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), INDEX_DATE_FORMAT)
        .map_err(|e| AppError::date_parse(input, e))?;

    naive
        .and_local_timezone(jst())
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::date_parse(input, "not a valid JST instant"))
}

/// Serde adapter rendering timestamps as ISO-8601 with milliseconds,
/// e.g. `2024-03-15T05:30:00.000Z`, matching the persisted JSON format.
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
