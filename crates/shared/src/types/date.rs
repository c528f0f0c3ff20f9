use chrono::{DateTime, Datelike, NaiveDate, ParseError, Utc};
use thiserror::Error;

/// Format used when dates are sent back to clients, e.g. `Mon Jan 01 2024`
pub const DISPLAY_DATE_FORMAT: &str = "%a %b %d %Y";

/// Format expected from clients, e.g. `2024-01-01`
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Dates are stored as text and compared lexically, which only matches
/// calendar order for four digit years
pub const MAX_INPUT_YEAR: i32 = 9999;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputDateError {
    #[error(transparent)]
    Format(#[from] ParseError),
    #[error("year {0} is outside 0..={MAX_INPUT_YEAR}")]
    YearOutOfRange(i32),
}

/// Parses a client supplied date.
///
/// Plain `YYYY-MM-DD` dates are preferred but RFC 3339 timestamps are accepted
/// too, in which case the UTC calendar date is used
pub fn parse_input_date(value: &str) -> Result<NaiveDate, InputDateError> {
    let value = value.trim();
    let date = NaiveDate::parse_from_str(value, INPUT_DATE_FORMAT).or_else(|e| {
        DateTime::parse_from_rfc3339(value)
            .map(|d| d.with_timezone(&Utc).date_naive())
            // Report the error for the preferred format
            .map_err(|_| e)
    })?;

    if !(0..=MAX_INPUT_YEAR).contains(&date.year()) {
        return Err(InputDateError::YearOutOfRange(date.year()));
    }
    Ok(date)
}

pub fn display_date(date: &NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
