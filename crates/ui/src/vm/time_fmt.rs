/// `mm:ss`, both parts zero-padded.
#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Width of the elapsed-time bar as a CSS percentage.
#[must_use]
pub fn elapsed_width(fraction: f64) -> String {
    format!("{:.1}%", fraction.clamp(0.0, 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_pads_minutes_and_seconds() {
        assert_eq!(format_countdown(1200), "20:00");
        assert_eq!(format_countdown(65), "01:05");
        assert_eq!(format_countdown(0), "00:00");
    }

    #[test]
    fn elapsed_width_is_clamped() {
        assert_eq!(elapsed_width(0.5), "50.0%");
        assert_eq!(elapsed_width(2.0), "100.0%");
    }
}
