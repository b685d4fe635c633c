//! Meeting scheduling endpoint.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use meetkit_core::MeetkitError;
use meetkit_zoom::{MeetingRequest, MeetingsClient, NewMeeting, to_zoom_start_time, validate_timezone};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::config::ServerConfig;

/// Fields every scheduling request must carry, checked in this order.
const REQUIRED_FIELDS: [&str; 4] = ["topic", "start_time", "duration", "timezone"];

#[derive(Clone)]
pub struct ScheduleController {
    meetings: Arc<MeetingsClient>,
    public_base_url: String,
    expose_error_details: bool,
}

impl ScheduleController {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            meetings: config.meetings.clone(),
            public_base_url: config.public_base_url.clone(),
            expose_error_details: config.security.expose_error_details,
        }
    }
}

fn reject(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(json!({ "success": false, "error": error.into() }))).into_response()
}

/// Validation errors are reported with their bare detail, without the
/// error-type prefix `Display` adds.
fn detail(err: &MeetkitError) -> String {
    match err {
        MeetkitError::InvalidInput(detail) => detail.clone(),
        other => other.to_string(),
    }
}

/// Coerces the `duration` field the way lenient clients expect: JSON
/// numbers are truncated to whole minutes and numeric strings are parsed.
fn duration_minutes(value: &Value) -> Option<i64> {
    if let Some(minutes) = value.as_i64() {
        return Some(minutes);
    }
    if let Some(minutes) = value.as_f64() {
        return Some(minutes as i64);
    }
    value.as_str()?.trim().parse().ok()
}

fn string_field(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Parses the loose JSON body into a [`MeetingRequest`], naming the first
/// missing or unusable field.
fn parse_request(data: &Value) -> std::result::Result<MeetingRequest, String> {
    for field in REQUIRED_FIELDS {
        if data.get(field).is_none() {
            return Err(format!("Missing: {field}"));
        }
    }

    let Some(duration) = duration_minutes(&data["duration"]) else {
        return Err("Invalid duration".to_string());
    };

    Ok(MeetingRequest {
        topic: Some(string_field(&data["topic"])),
        start_time: Some(string_field(&data["start_time"])),
        duration: Some(duration),
        timezone: Some(string_field(&data["timezone"])),
        join_before_host: data.get("join_before_host").and_then(Value::as_bool),
        mute_upon_entry: data.get("mute_upon_entry").and_then(Value::as_bool),
        waiting_room: data.get("waiting_room").and_then(Value::as_bool),
    })
}

/// `POST /api/schedule/`
///
/// Creates a Zoom meeting. Validation failures answer 400 with the first
/// problem found; a missing OAuth token answers 401 with a setup link;
/// Zoom-side failures keep their upstream status so callers can tell a
/// rate limit from a bad request.
pub async fn schedule_meeting(
    State(controller): State<ScheduleController>,
    body: Bytes,
) -> Response {
    // Anything that does not parse to a JSON object gets the same answer,
    // whatever the content type says.
    let data = match serde_json::from_slice::<Value>(&body) {
        Ok(data) if data.is_object() => data,
        _ => return reject(StatusCode::BAD_REQUEST, "JSON body required"),
    };

    let request = match parse_request(&data) {
        Ok(request) => request,
        Err(message) => return reject(StatusCode::BAD_REQUEST, message),
    };

    let timezone = request.timezone.clone().unwrap_or_default();
    let tz = match validate_timezone(&timezone) {
        Ok(tz) => tz,
        Err(e) => return reject(StatusCode::BAD_REQUEST, detail(&e)),
    };

    let start_time = request.start_time.as_deref().unwrap_or_default();
    let start_time_utc = match to_zoom_start_time(start_time, tz) {
        Ok(utc) => utc,
        Err(e) => {
            return reject(
                StatusCode::BAD_REQUEST,
                format!("Invalid start_time: {}", detail(&e)),
            );
        }
    };

    let meeting = NewMeeting {
        topic: request.topic.clone().unwrap_or_default(),
        start_time_utc,
        duration: request.duration.unwrap_or_default(),
        timezone,
        settings: request.settings(),
    };

    match controller.meetings.create_meeting(&meeting).await {
        Ok(created) => {
            tracing::info!(meeting_id = ?created.id, topic = %meeting.topic, "Meeting created");
            (
                StatusCode::CREATED,
                Json(json!({ "success": true, "meeting": created })),
            )
                .into_response()
        }
        Err(MeetkitError::AuthRequired(message)) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "error": message,
                "setup_url": format!("{}/oauth/login", controller.public_base_url),
            })),
        )
            .into_response(),
        Err(MeetkitError::RateLimited { retry_after }) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Rate limited", "retry_after": retry_after })),
        )
            .into_response(),
        Err(MeetkitError::ZoomApi { status, message }) => reject(
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            message,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Meeting creation failed");
            let message = if controller.expose_error_details {
                e.to_string()
            } else {
                "Internal server error".to_string()
            };
            reject(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_coercion() {
        assert_eq!(duration_minutes(&json!(45)), Some(45));
        assert_eq!(duration_minutes(&json!(45.9)), Some(45));
        assert_eq!(duration_minutes(&json!(" 30 ")), Some(30));
        assert_eq!(duration_minutes(&json!("soon")), None);
        assert_eq!(duration_minutes(&json!(null)), None);
        assert_eq!(duration_minutes(&json!([45])), None);
    }

    #[test]
    fn test_parse_request_names_first_missing_field() {
        let err = parse_request(&json!({ "start_time": "2025-11-16T14:30:00" })).unwrap_err();
        assert_eq!(err, "Missing: topic");

        let err = parse_request(&json!({
            "topic": "Sync",
            "start_time": "2025-11-16T14:30:00",
            "duration": 30
        }))
        .unwrap_err();
        assert_eq!(err, "Missing: timezone");

        let err = parse_request(&json!({
            "topic": "Sync",
            "start_time": "2025-11-16T14:30:00",
            "duration": "half an hour",
            "timezone": "Asia/Kolkata"
        }))
        .unwrap_err();
        assert_eq!(err, "Invalid duration");
    }

    #[test]
    fn test_parse_request_coerces_loose_types() {
        let request = parse_request(&json!({
            "topic": 42,
            "start_time": "2025-11-16T14:30:00",
            "duration": "60",
            "timezone": "Asia/Kolkata",
            "waiting_room": true
        }))
        .unwrap();
        assert_eq!(request.topic.as_deref(), Some("42"));
        assert_eq!(request.duration, Some(60));
        assert!(request.settings().waiting_room);
        assert!(request.settings().join_before_host);
    }
}
