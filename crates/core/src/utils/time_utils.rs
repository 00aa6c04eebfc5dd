use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Interprets a calendar date as the UTC midnight instant.
///
/// This is the single source of truth for turning user-supplied dates
/// (CLI flags, environment variables) into sync window bounds.
pub fn date_to_utc_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
}

/// Parses a `YYYY-MM-DD` string into a UTC midnight instant.
pub fn parse_sync_date(raw: &str) -> crate::Result<DateTime<Utc>> {
    let date = raw.trim().parse::<NaiveDate>()?;
    Ok(date_to_utc_start(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_date() {
        let parsed = parse_sync_date("2024-01-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_sync_date_rejects_garbage() {
        assert!(parse_sync_date("not-a-date").is_err());
        assert!(parse_sync_date("2024-13-01").is_err());
    }
}
