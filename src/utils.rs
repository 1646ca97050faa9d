//! Common formatting helpers used across modules.
//!
//! - [`format_count_with_separator`] - Format counts with thousands separator (1,234,567)
//! - [`format_remaining`] - Compact time-left display (2d3h, 45m, 10s)

use chrono::Duration;

/// Group the digits of a record count in threes for log summaries.
///
/// # Examples
/// ```
/// use banstore::utils::format_count_with_separator;
/// assert_eq!(format_count_with_separator(5000), "5,000");
/// assert_eq!(format_count_with_separator(42), "42");
/// ```
pub fn format_count_with_separator(n: usize) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - head) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a positive duration using its two most significant units.
///
/// # Examples
/// ```
/// use banstore::utils::format_remaining;
/// use chrono::Duration;
/// assert_eq!(format_remaining(Duration::hours(51)), "2d3h");
/// assert_eq!(format_remaining(Duration::minutes(45)), "45m");
/// assert_eq!(format_remaining(Duration::milliseconds(10)), "<1s");
/// ```
pub fn format_remaining(left: Duration) -> String {
    let total = left.num_seconds();
    if total < 1 {
        return "<1s".to_string();
    }

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let parts = [(days, "d"), (hours, "h"), (minutes, "m"), (seconds, "s")];
    let first = parts.iter().position(|(v, _)| *v > 0).unwrap_or(3);
    parts[first..]
        .iter()
        .take(2)
        .filter(|(v, _)| *v > 0)
        .map(|(v, unit)| format!("{}{}", v, unit))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add::AddSummary;

    #[test]
    fn test_format_count_with_separator_on_summaries() {
        let small = AddSummary { added: 7, rejected: 0 };
        let bulk = AddSummary { added: 5000, rejected: 123_456 };
        assert_eq!(format_count_with_separator(small.added), "7");
        assert_eq!(format_count_with_separator(small.rejected), "0");
        assert_eq!(format_count_with_separator(bulk.added), "5,000");
        assert_eq!(format_count_with_separator(bulk.rejected), "123,456");
        assert_eq!(format_count_with_separator(16_777_216), "16,777,216");
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(Duration::seconds(10)), "10s");
        assert_eq!(format_remaining(Duration::seconds(125)), "2m5s");
        assert_eq!(format_remaining(Duration::hours(2)), "2h");
        assert_eq!(format_remaining(Duration::minutes(90)), "1h30m");
        assert_eq!(format_remaining(Duration::days(14)), "14d");
        assert_eq!(format_remaining(Duration::days(1) + Duration::minutes(5)), "1d");
        assert_eq!(format_remaining(Duration::zero()), "<1s");
    }
}
