//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// Format a date for event cards, e.g. "January 20, 2024"
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%B %-d, %Y").to_string()
}

/// Format a time of day for event cards, e.g. "09:00"
pub fn format_time(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

/// Truncate text to a maximum length with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Split comma separated skills, trimming blanks away
pub fn parse_skills(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a user supplied timestamp.
///
/// Accepts RFC 3339 as well as the `YYYY-MM-DDTHH:MM` shape produced by
/// datetime-local inputs, which is read in local time.
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a rather long description", 10), "a rathe...");
    }

    #[test]
    fn test_parse_skills() {
        assert_eq!(
            parse_skills(" Medical, Organization ,,"),
            vec!["Medical".to_string(), "Organization".to_string()]
        );
        assert!(parse_skills("").is_empty());
    }

    #[test]
    fn test_parse_datetime_rfc3339() {
        let parsed = parse_datetime("2024-01-20T09:00:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 20, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_local_input() {
        assert!(parse_datetime("2024-02-25T06:00").is_some());
        assert!(parse_datetime("next tuesday").is_none());
    }
}
