//! Display formatting for clock values.

/// Text shown when no time limit applies.
pub const INDEFINITE_PLACEHOLDER: &str = "--:--";

/// Formats seconds as `H:MM:SS` when there are hours, `M:SS` otherwise.
///
/// Values are rounded to the nearest second, so a countdown reads `0:00`
/// from 0.5 s left, before time over fires at 0.1 s. Negative and non-finite
/// values render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
