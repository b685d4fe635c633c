use crate::oauth::ZoomOauth;
use crate::types::{Meeting, NewMeeting};
use meetkit_core::{MeetkitError, Result};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Zoom Meetings API client. Bearer tokens come from the shared
/// [`ZoomOauth`] flow, refreshed as needed.
pub struct MeetingsClient {
    client: Client,
    oauth: Arc<ZoomOauth>,
}

#[derive(Serialize)]
struct CreateMeetingBody<'a> {
    topic: &'a str,
    /// 2 = scheduled meeting.
    #[serde(rename = "type")]
    meeting_type: i32,
    start_time: &'a str,
    duration: i64,
    timezone: &'a str,
    settings: SettingsBody,
}

#[derive(Serialize)]
struct SettingsBody {
    join_before_host: bool,
    mute_upon_entry: bool,
    waiting_room: bool,
}

impl MeetingsClient {
    pub fn new(oauth: Arc<ZoomOauth>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MeetkitError::Zoom(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, oauth })
    }

    pub fn oauth(&self) -> &Arc<ZoomOauth> {
        &self.oauth
    }

    /// Create a scheduled meeting for the authorized user.
    ///
    /// Zoom 429s become [`MeetkitError::RateLimited`] with the upstream
    /// `Retry-After`; any other non-201 becomes [`MeetkitError::ZoomApi`]
    /// carrying the status and response body.
    pub async fn create_meeting(&self, meeting: &NewMeeting) -> Result<Meeting> {
        let token = self.oauth.access_token().await?;
        let url = format!("{}/v2/users/me/meetings", self.oauth.config().api_base);

        let body = CreateMeetingBody {
            topic: &meeting.topic,
            meeting_type: 2,
            start_time: &meeting.start_time_utc,
            duration: meeting.duration,
            timezone: &meeting.timezone,
            settings: SettingsBody {
                join_before_host: meeting.settings.join_before_host,
                mute_upon_entry: meeting.settings.mute_upon_entry,
                waiting_room: meeting.settings.waiting_room,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| MeetkitError::Zoom(format!("Meeting creation failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(MeetkitError::RateLimited { retry_after });
        }

        if status != reqwest::StatusCode::CREATED {
            let message = response.text().await.unwrap_or_default();
            return Err(MeetkitError::ZoomApi { status: status.as_u16(), message });
        }

        response
            .json::<Meeting>()
            .await
            .map_err(|e| MeetkitError::Zoom(format!("Invalid meeting response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MeetingSettings;

    #[test]
    fn test_create_meeting_body_shape() {
        let meeting = NewMeeting {
            topic: "Design review".to_string(),
            start_time_utc: "2025-11-15T04:30:00Z".to_string(),
            duration: 45,
            timezone: "Asia/Kolkata".to_string(),
            settings: MeetingSettings::default(),
        };

        let body = CreateMeetingBody {
            topic: &meeting.topic,
            meeting_type: 2,
            start_time: &meeting.start_time_utc,
            duration: meeting.duration,
            timezone: &meeting.timezone,
            settings: SettingsBody {
                join_before_host: meeting.settings.join_before_host,
                mute_upon_entry: meeting.settings.mute_upon_entry,
                waiting_room: meeting.settings.waiting_room,
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], 2);
        assert_eq!(json["start_time"], "2025-11-15T04:30:00Z");
        assert_eq!(json["settings"]["join_before_host"], true);
        assert_eq!(json["settings"]["waiting_room"], false);
    }
}
