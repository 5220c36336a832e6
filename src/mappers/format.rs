use chrono::{DateTime, NaiveDate, Utc};

pub const NOT_SET: &str = "No establecido";
pub const UNKNOWN_ROLE: &str = "Desconocido";

const INPUT_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Accepts plain dates and RFC 3339 timestamps.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(value, INPUT_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            parse_date(value)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// `dd/mm/yyyy`, or "No establecido" when missing or unreadable.
pub fn format_date_display(value: Option<&str>) -> String {
    value
        .and_then(parse_date)
        .map(|d| d.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| NOT_SET.to_string())
}

/// `yyyy-mm-dd` for date inputs, or an empty string.
pub fn format_date_input(value: Option<&str>) -> String {
    value
        .and_then(parse_date)
        .map(|d| d.format(INPUT_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_defaults_to_not_set() {
        assert_eq!(format_date_display(None), "No establecido");
        assert_eq!(format_date_display(Some("")), "No establecido");
        assert_eq!(format_date_display(Some("mañana")), "No establecido");
        assert_eq!(format_date_display(Some("2025-03-09")), "09/03/2025");
        assert_eq!(format_date_display(Some("2025-03-09T15:00:00Z")), "09/03/2025");
    }

    #[test]
    fn input_defaults_to_empty() {
        assert_eq!(format_date_input(None), "");
        assert_eq!(format_date_input(Some("2025-03-09T15:00:00-03:00")), "2025-03-09");
    }

    #[test]
    fn timestamps_accept_plain_dates() {
        let ts = parse_timestamp("2024-08-01").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-08-01T00:00:00+00:00");
        assert!(parse_timestamp("nope").is_none());
    }
}
