//! Date/time utilities for LearnSync.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Format a `DateTime<Utc>` in the specified timezone.
///
/// # Arguments
///
/// * `dt` - DateTime in UTC
/// * `timezone` - Timezone name (e.g., "Asia/Shanghai", "UTC")
/// * `format` - Output format string (e.g., "%H:%M:%S")
///
/// Falls back to UTC when the timezone name is unknown.
pub fn format_utc_datetime(dt: &DateTime<Utc>, timezone: &str, format: &str) -> String {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => return dt.format(format).to_string(),
    };
    dt.with_timezone(&tz).format(format).to_string()
}

/// Check whether a timezone name is known.
pub fn is_valid_timezone(timezone: &str) -> bool {
    timezone.parse::<Tz>().is_ok()
}
