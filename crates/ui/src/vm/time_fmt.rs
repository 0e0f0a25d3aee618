use chrono::{DateTime, Utc};

/// Day-first calendar date, as shown on the course dashboard.
#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%d/%m/%Y").to_string()
}

/// Human label for a total number of minutes.
#[must_use]
pub fn format_minutes(total: u32) -> String {
    match (total / 60, total % 60) {
        (0, minutes) => format!("{minutes} min"),
        (hours, 0) => format!("{hours} h"),
        (hours, minutes) => format!("{hours} h {minutes} min"),
    }
}
