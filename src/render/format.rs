//! Display formatting helpers shared by renderers and placeholder labels.

use chrono::DateTime;
use std::time::Duration;

/// Human-readable elapsed time, coarse on purpose: `3s`, `2m 10s`,
/// `1h 2m 3s`, `2d 1h 0m 5s`. Sub-second runs round down to `0s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let days = total / 86400;
    let hours = (total % 86400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if total < 60 {
        format!("{seconds}s")
    } else if total < 3600 {
        format!("{minutes}m {seconds}s")
    } else if total < 86400 {
        format!("{hours}h {minutes}m {seconds}s")
    } else {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    }
}

/// ISO-8601 wall-clock rendering of an epoch-millisecond timestamp, UTC,
/// second precision, no offset suffix. `None` when the value is outside
/// chrono's representable range.
pub fn format_epoch_ms(ms: i64) -> Option<String> {
    let datetime = DateTime::from_timestamp_millis(ms)?;
    Some(datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Neutralize markup-significant angle brackets in text destined for rich
/// widgets. Error messages routinely embed things like `<Response [403]>`
/// which HTML-backed hosts would otherwise swallow as tags.
pub fn sanitize_markup(text: &str) -> String {
    text.replace('<', "{").replace('>', "}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_seconds_only() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0s");
        assert_eq!(format_elapsed(Duration::from_millis(2400)), "2s");
        assert_eq!(format_elapsed(Duration::from_secs(59)), "59s");
    }

    #[test]
    fn test_elapsed_minutes() {
        assert_eq!(format_elapsed(Duration::from_secs(60)), "1m 0s");
        assert_eq!(format_elapsed(Duration::from_secs(130)), "2m 10s");
        assert_eq!(format_elapsed(Duration::from_secs(3599)), "59m 59s");
    }

    #[test]
    fn test_elapsed_hours_and_days() {
        assert_eq!(format_elapsed(Duration::from_secs(3723)), "1h 2m 3s");
        assert_eq!(format_elapsed(Duration::from_secs(90061)), "1d 1h 1m 1s");
    }

    #[test]
    fn test_epoch_formatting() {
        assert_eq!(format_epoch_ms(0).unwrap(), "1970-01-01T00:00:00");
        assert_eq!(format_epoch_ms(86_400_000).unwrap(), "1970-01-02T00:00:00");
        // Sub-second precision truncates
        assert_eq!(format_epoch_ms(1_500).unwrap(), "1970-01-01T00:00:01");
    }

    #[test]
    fn test_epoch_before_unix_zero() {
        assert_eq!(format_epoch_ms(-86_400_000).unwrap(), "1969-12-31T00:00:00");
    }

    #[test]
    fn test_epoch_out_of_range() {
        assert!(format_epoch_ms(i64::MAX).is_none());
    }

    #[test]
    fn test_sanitize_markup() {
        assert_eq!(
            sanitize_markup("<Response [403]> from <server>"),
            "{Response [403]} from {server}"
        );
        assert_eq!(sanitize_markup("plain text"), "plain text");
    }
}
