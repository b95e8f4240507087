use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::parse::parse_date;

/// Error type for due-date resolution. Callers treat both variants as
/// "no due date" during review, and as a validation error for `add`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DueError {
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("unrecognized due date: {0} (use YYYY-MM-DD, a weekday, today or tomorrow)")]
    UnrecognizedToken(String),
}

/// Resolve a user-supplied due token relative to `today`.
///
/// Weekday names always land strictly in the future: asking for `monday` on a
/// Monday gives next week's Monday.
pub fn resolve_due(token: &str, today: NaiveDate) -> Result<NaiveDate, DueError> {
    let token = token.trim();
    let lower = token.to_ascii_lowercase();

    if looks_like_date(&lower) {
        return parse_date(&lower).ok_or_else(|| DueError::InvalidDate(token.to_string()));
    }

    match lower.as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return Ok(today + Duration::days(1)),
        _ => {}
    }

    match parse_weekday(&lower) {
        Some(weekday) => Ok(next_weekday(today, weekday)),
        None => Err(DueError::UnrecognizedToken(token.to_string())),
    }
}

/// The next `weekday` strictly after `today`
pub fn next_weekday(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let from = today.weekday().num_days_from_monday() as i64;
    let to = weekday.num_days_from_monday() as i64;
    let mut ahead = (to - from).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    today + Duration::days(ahead)
}

fn parse_weekday(value: &str) -> Option<Weekday> {
    match value {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// `NNNN-NN-NN` shape, before calendar validation
fn looks_like_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
