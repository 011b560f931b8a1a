use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Format a timestamp as `YYYY-MM-DD HH:MM` (UTC)
pub fn format_timestamp(when: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    when.format(&format)
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Parse a `YYYY-MM-DD` date into UTC midnight of that day
pub fn parse_date(input: &str) -> Result<OffsetDateTime, String> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(input.trim(), &format)
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| format!("Invalid date format: {}, expected YYYY-MM-DD", input))
}

/// Clip `text` to `width` characters, for fixed-width columns
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        clipped.push('…');
        clipped
    }
}
