/// Renders a retry-after value as `H:MM:SS`, dropping the fractional second.
pub fn format_retry_after(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };

    format!("{}:{:02}:{:02}", total / 3600, total % 3600 / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::format_retry_after;

    #[test]
    fn truncates_to_whole_seconds() {
        assert_eq!(format_retry_after(125.4), "0:02:05");
        assert_eq!(format_retry_after(59.999), "0:00:59");
    }

    #[test]
    fn hours_are_not_wrapped() {
        assert_eq!(format_retry_after(3600.0), "1:00:00");
        assert_eq!(format_retry_after(90000.0), "25:00:00");
    }

    #[test]
    fn invalid_values_clamp_to_zero() {
        assert_eq!(format_retry_after(-3.0), "0:00:00");
        assert_eq!(format_retry_after(f64::NAN), "0:00:00");
    }
}
