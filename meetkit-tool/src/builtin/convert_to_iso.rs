use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use meetkit_core::{Result, Tool, ToolContext};
use meetkit_zoom::validate_timezone;
use serde_json::{Value, json};
use std::sync::Arc;

/// Datetime formats accepted from the model, most specific first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%B %d, %Y %I:%M %p",
    "%B %d %Y %I:%M %p",
    "%b %d, %Y %I:%M %p",
    "%d %B %Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M",
];

/// Date-only formats, interpreted as midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%m/%d/%Y"];

/// Normalizes a human-readable date and time into the `YYYY-MM-DDTHH:MM:SS`
/// wall-clock form `schedule_meeting` expects.
///
/// Parse and timezone failures are reported as `Error: …` strings in the
/// result rather than tool errors, so the model re-asks the user instead of
/// aborting the turn.
pub struct ConvertToIsoTool;

#[async_trait]
impl Tool for ConvertToIsoTool {
    fn name(&self) -> &str {
        "convert_to_iso"
    }

    fn description(&self) -> &str {
        "Converts a human-readable date and time string into ISO 8601 format \
         (YYYY-MM-DDTHH:MM:SS) in the given IANA timezone."
    }

    fn declaration(&self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "parameters": {
                "type": "object",
                "properties": {
                    "datetime_string": {
                        "type": "string",
                        "description": "The human-readable date and time, e.g. 'November 19, 2025 10:00 AM'."
                    },
                    "timezone_iana": {
                        "type": "string",
                        "description": "IANA timezone id, e.g. 'Asia/Kolkata' or 'America/New_York'."
                    }
                },
                "required": ["datetime_string", "timezone_iana"]
            }
        })
    }

    async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let datetime_string = args["datetime_string"].as_str().unwrap_or("").trim().to_string();
        let timezone_iana = args["timezone_iana"].as_str().unwrap_or("").trim().to_string();

        if validate_timezone(&timezone_iana).is_err() {
            return Ok(json!({
                "result": format!("Error: The timezone '{}' is not valid.", timezone_iana)
            }));
        }

        match parse_wall_time(&datetime_string) {
            Some(naive) => Ok(json!({
                "result": naive.format("%Y-%m-%dT%H:%M:%S").to_string()
            })),
            None => Ok(json!({
                "result": format!(
                    "Error: Could not parse '{}' using timezone '{}'. Please specify a clearer date/time.",
                    datetime_string, timezone_iana
                )
            })),
        }
    }
}

/// Parse to a wall-clock time, dropping any explicit offset: the scheduling
/// API localizes the naive value in the request's timezone.
fn parse_wall_time(input: &str) -> Option<NaiveDateTime> {
    if input.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(input) {
        return Some(with_offset.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}
