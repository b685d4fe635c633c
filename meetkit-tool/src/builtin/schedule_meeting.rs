use async_trait::async_trait;
use meetkit_core::{MeetkitError, Result, Tool, ToolContext};
use meetkit_zoom::{pretty_local, to_zoom_start_time, validate_timezone};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

/// Books a Zoom meeting by calling the scheduling API.
///
/// Replies always use the `{content, artifact?, is_error}` shape the agent
/// instruction references: missing fields produce a prompt-back with
/// `is_error: false`, real failures set `is_error: true`, and successes
/// carry a markdown confirmation plus the raw API response as `artifact`.
pub struct ScheduleMeetingTool {
    client: reqwest::Client,
    endpoint: String,
}

impl ScheduleMeetingTool {
    /// `api_base` is the scheduling API origin, e.g. `http://localhost:8888`.
    pub fn new(api_base: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| MeetkitError::Tool(format!("Failed to create HTTP client: {}", e)))?;
        let base = api_base.into();
        Ok(Self { client, endpoint: format!("{}/api/schedule/", base.trim_end_matches('/')) })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn reply(content: String, is_error: bool) -> Value {
    json!({"content": content, "is_error": is_error})
}

fn error_detail(err: &MeetkitError) -> String {
    match err {
        MeetkitError::InvalidInput(detail) => detail.clone(),
        other => other.to_string(),
    }
}

fn duration_arg(args: &Value) -> Option<i64> {
    match &args["duration"] {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl Tool for ScheduleMeetingTool {
    fn name(&self) -> &str {
        "schedule_meeting"
    }

    fn description(&self) -> &str {
        "Schedule a Zoom meeting. Requires topic, start_time (ISO local time), \
         duration in minutes, and an IANA timezone."
    }

    fn declaration(&self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "parameters": {
                "type": "object",
                "properties": {
                    "topic": {"type": "string", "description": "Meeting title."},
                    "start_time": {
                        "type": "string",
                        "description": "Local start time in ISO format, e.g. 2025-11-16T14:30:00. No offset."
                    },
                    "duration": {"type": "integer", "description": "Length in minutes."},
                    "timezone": {
                        "type": "string",
                        "description": "IANA timezone id, e.g. Asia/Kolkata."
                    },
                    "join_before_host": {"type": "boolean", "description": "Allow joining before the host."},
                    "mute_upon_entry": {"type": "boolean", "description": "Mute participants on entry."},
                    "waiting_room": {"type": "boolean", "description": "Enable the waiting room."}
                },
                "required": ["topic", "start_time", "duration", "timezone"]
            }
        })
    }

    async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let topic = args["topic"].as_str().unwrap_or("").trim().to_string();
        let start_time = args["start_time"].as_str().unwrap_or("").trim().to_string();
        let timezone = args["timezone"].as_str().unwrap_or("").trim().to_string();
        let duration = duration_arg(&args);

        let mut missing = Vec::new();
        if topic.is_empty() {
            missing.push("topic");
        }
        if start_time.is_empty() {
            missing.push("start_time");
        }
        if duration.is_none_or(|d| d <= 0) {
            missing.push("duration");
        }
        if timezone.is_empty() {
            missing.push("timezone");
        }
        if !missing.is_empty() {
            return Ok(reply(
                format!(
                    "Please provide the missing details: **{}**.\n\
                     Example: `topic: Team Sync`, `start_time: 2025-11-16T14:30:00`, etc.",
                    missing.join(", ")
                ),
                false,
            ));
        }
        let duration = duration.unwrap_or_default();

        let tz = match validate_timezone(&timezone) {
            Ok(tz) => tz,
            Err(_) => {
                return Ok(reply(
                    format!(
                        "Invalid timezone: `{}`. Use IANA name like `Asia/Kolkata`, `America/New_York`.",
                        timezone
                    ),
                    true,
                ));
            }
        };

        let utc_start = match to_zoom_start_time(&start_time, tz) {
            Ok(utc_start) => utc_start,
            Err(e) => {
                return Ok(reply(
                    format!("Invalid start_time format. Use: `YYYY-MM-DDTHH:MM:SS` → {}", error_detail(&e)),
                    true,
                ));
            }
        };

        let payload = json!({
            "topic": topic,
            "start_time": utc_start,
            "duration": duration,
            "timezone": timezone,
            "join_before_host": args["join_before_host"].as_bool().unwrap_or(true),
            "mute_upon_entry": args["mute_upon_entry"].as_bool().unwrap_or(true),
            "waiting_room": args["waiting_room"].as_bool().unwrap_or(false),
        });

        let response = match self.client.post(&self.endpoint).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => return Ok(reply(format!("Unexpected error: {}", e), true)),
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Ok(reply(
                format!("API call failed (HTTP {}): {}", status.as_u16(), body),
                true,
            ));
        }

        let result: Value = match serde_json::from_str(&body) {
            Ok(result) => result,
            Err(e) => return Ok(reply(format!("Unexpected error: {}", e), true)),
        };

        if result["success"].as_bool() != Some(true) {
            let error = result["error"].as_str().unwrap_or("Unknown");
            return Ok(reply(format!("Zoom API error: {}", error), true));
        }

        let meeting = &result["meeting"];
        let meeting_start = meeting["start_time"].as_str().unwrap_or(&utc_start);
        let pretty_time =
            pretty_local(meeting_start, tz).unwrap_or_else(|_| meeting_start.to_string());

        let content = format!(
            "**Meeting Scheduled Successfully!**\n\n\
             **Topic:** {}\n\
             **When:** {} ({})\n\
             **Duration:** {} minutes\n\
             **Join Link:** {}\n\
             **Meeting ID:** `{}`\n\
             **Passcode:** `{}`\n\n\
             _Host start link (private): {}_",
            meeting["topic"].as_str().unwrap_or(&topic),
            pretty_time,
            timezone,
            duration,
            meeting["join_url"].as_str().unwrap_or(""),
            meeting["id"],
            meeting["password"].as_str().unwrap_or(""),
            meeting["start_url"].as_str().unwrap_or(""),
        );

        Ok(json!({"content": content, "artifact": result, "is_error": false}))
    }
}
