use chrono::Duration;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Rounds a minute value to two decimal places, halves away from zero.
pub fn round_minutes(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts a duration to fractional minutes rounded to two places.
pub fn duration_to_minutes(duration: Duration) -> f64 {
    round_minutes(duration.num_milliseconds() as f64 / 1000.0 / 60.0)
}

/// Renders a minute value the way it is stored in the log file.
///
/// Whole numbers keep a trailing `.0` so that `0.0` and `-60.0` read as
/// decimals next to values like `1.5`.
pub fn format_minutes(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Formats an elapsed duration as `HH:MM:SS`.
///
/// Like a time-of-day clock the hours wrap at 24, so 25 hours reads
/// `01:00:00`. Negative durations show as zero.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0) % SECONDS_PER_DAY;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
