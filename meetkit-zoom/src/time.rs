//! Start-time parsing and timezone handling for meeting requests.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use meetkit_core::{MeetkitError, Result};

/// Naive formats accepted for start times without an explicit offset.
const NAIVE_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Look up an IANA timezone id.
pub fn validate_timezone(timezone: &str) -> Result<Tz> {
    timezone
        .parse::<Tz>()
        .map_err(|_| MeetkitError::InvalidInput(format!("Invalid timezone: {}", timezone)))
}

/// Convert a user-supplied start time into the UTC `YYYY-MM-DDTHH:MM:SSZ`
/// form Zoom expects.
///
/// RFC 3339 input (including a trailing `Z`) keeps its own offset; naive
/// input is interpreted in `tz`. Times that fall in a DST gap are rejected;
/// ambiguous times take the earlier offset.
pub fn to_zoom_start_time(start_time: &str, tz: Tz) -> Result<String> {
    let utc = parse_in_zone(start_time, tz)?;
    Ok(utc.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Parse a start time the same way [`to_zoom_start_time`] does, returning
/// the UTC instant.
pub fn parse_in_zone(start_time: &str, tz: Tz) -> Result<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(start_time) {
        return Ok(with_offset.with_timezone(&Utc));
    }

    let naive = parse_naive(start_time)?;
    localize(naive, tz)
}

/// Render a UTC instant in `tz` for human-facing confirmations,
/// e.g. `November 15, 2025 at 10:00 AM`.
pub fn pretty_local(start_time_utc: &str, tz: Tz) -> Result<String> {
    let utc = DateTime::parse_from_rfc3339(start_time_utc)
        .map_err(|e| MeetkitError::InvalidInput(format!("could not parse '{}': {}", start_time_utc, e)))?
        .with_timezone(&Utc);
    Ok(utc.with_timezone(&tz).format("%B %d, %Y at %I:%M %p").to_string())
}

fn parse_naive(start_time: &str) -> Result<NaiveDateTime> {
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(start_time, format) {
            return Ok(naive);
        }
    }
    Err(MeetkitError::InvalidInput(format!("could not parse '{}'", start_time)))
}

fn localize(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        chrono::LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        chrono::LocalResult::None => Err(MeetkitError::InvalidInput(format!(
            "'{}' does not exist in {}",
            naive, tz
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_timezone() {
        assert!(validate_timezone("Asia/Kolkata").is_ok());
        assert!(validate_timezone("America/New_York").is_ok());
        assert!(validate_timezone("Mars/Olympus").is_err());
        assert!(validate_timezone("").is_err());
    }

    #[test]
    fn test_naive_time_localized_in_zone() {
        let tz = validate_timezone("Asia/Kolkata").unwrap();
        let start = to_zoom_start_time("2025-11-15T10:00:00", tz).unwrap();
        assert_eq!(start, "2025-11-15T04:30:00Z");
    }

    #[test]
    fn test_accepts_minute_precision_and_space_separator() {
        let tz = validate_timezone("Asia/Kolkata").unwrap();
        assert_eq!(
            to_zoom_start_time("2025-11-15T10:00", tz).unwrap(),
            "2025-11-15T04:30:00Z"
        );
        assert_eq!(
            to_zoom_start_time("2025-11-15 10:00:00", tz).unwrap(),
            "2025-11-15T04:30:00Z"
        );
    }

    #[test]
    fn test_explicit_offset_wins_over_zone() {
        let tz = validate_timezone("Asia/Kolkata").unwrap();
        let start = to_zoom_start_time("2025-11-15T10:00:00+02:00", tz).unwrap();
        assert_eq!(start, "2025-11-15T08:00:00Z");

        let zulu = to_zoom_start_time("2025-11-15T10:00:00Z", tz).unwrap();
        assert_eq!(zulu, "2025-11-15T10:00:00Z");
    }

    #[test]
    fn test_dst_gap_rejected() {
        // 2:30 AM on 2025-03-09 never happens in US Eastern.
        let tz = validate_timezone("America/New_York").unwrap();
        let err = to_zoom_start_time("2025-03-09T02:30:00", tz).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_dst_ambiguity_takes_earlier_offset() {
        // 1:30 AM on 2025-11-02 happens twice in US Eastern; EDT (-04:00) is first.
        let tz = validate_timezone("America/New_York").unwrap();
        let start = to_zoom_start_time("2025-11-02T01:30:00", tz).unwrap();
        assert_eq!(start, "2025-11-02T05:30:00Z");
    }

    #[test]
    fn test_unparseable_input() {
        let tz = validate_timezone("Asia/Kolkata").unwrap();
        assert!(to_zoom_start_time("next tuesday", tz).is_err());
        assert!(to_zoom_start_time("", tz).is_err());
    }

    #[test]
    fn test_pretty_local() {
        let tz = validate_timezone("Asia/Kolkata").unwrap();
        let pretty = pretty_local("2025-11-15T04:30:00Z", tz).unwrap();
        assert_eq!(pretty, "November 15, 2025 at 10:00 AM");
    }
}
