//! Player time display
//!
//! Track durations and playback positions are shown as `M:SS`, the format
//! used by the surah list and the progress bar.

/// Format seconds as `M:SS`
///
/// Minutes are not capped, so a two-hour surah reads `120:00`. Zero,
/// negative, and non-finite inputs all read `0:00`.
///
/// # Examples
///
/// ```
/// use qradio_common::time::format_clock;
///
/// assert_eq!(format_clock(0.0), "0:00");
/// assert_eq!(format_clock(65.9), "1:05");
/// assert_eq!(format_clock(3600.0), "60:00");
/// ```
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Format a millisecond duration as `M:SS`; `None` reads `0:00`
///
/// # Examples
///
/// ```
/// use qradio_common::time::format_duration_ms;
///
/// assert_eq!(format_duration_ms(Some(125_000)), "2:05");
/// assert_eq!(format_duration_ms(None), "0:00");
/// ```
pub fn format_duration_ms(duration_ms: Option<u64>) -> String {
    match duration_ms {
        Some(ms) => format_clock(ms as f64 / 1000.0),
        None => format_clock(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_are_zero_padded() {
        assert_eq!(format_clock(5.0), "0:05");
        assert_eq!(format_clock(59.999), "0:59");
        assert_eq!(format_clock(60.0), "1:00");
        assert_eq!(format_clock(601.0), "10:01");
    }

    #[test]
    fn test_invalid_inputs_read_zero() {
        assert_eq!(format_clock(-3.0), "0:00");
        assert_eq!(format_clock(f64::NAN), "0:00");
        assert_eq!(format_clock(f64::INFINITY), "0:00");
    }

    #[test]
    fn test_long_durations_keep_counting_minutes() {
        // Al-Baqarah runs past two hours for slower reciters
        assert_eq!(format_clock(7384.0), "123:04");
    }

    #[test]
    fn test_millisecond_durations() {
        assert_eq!(format_duration_ms(Some(0)), "0:00");
        assert_eq!(format_duration_ms(Some(999)), "0:00");
        assert_eq!(format_duration_ms(Some(61_500)), "1:01");
    }
}
