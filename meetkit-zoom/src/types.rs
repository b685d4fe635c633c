use serde::{Deserialize, Serialize};

/// Body of `POST /api/schedule/` as clients send it. Presence of required
/// fields is checked by the handler so it can name the first missing one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeetingRequest {
    pub topic: Option<String>,
    pub start_time: Option<String>,
    pub duration: Option<i64>,
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_before_host: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mute_upon_entry: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_room: Option<bool>,
}

impl MeetingRequest {
    /// Settings block with the product defaults filled in.
    pub fn settings(&self) -> MeetingSettings {
        MeetingSettings {
            join_before_host: self.join_before_host.unwrap_or(true),
            mute_upon_entry: self.mute_upon_entry.unwrap_or(true),
            waiting_room: self.waiting_room.unwrap_or(false),
        }
    }
}

/// The Zoom meeting settings this product exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSettings {
    pub join_before_host: bool,
    pub mute_upon_entry: bool,
    pub waiting_room: bool,
}

impl Default for MeetingSettings {
    fn default() -> Self {
        Self { join_before_host: true, mute_upon_entry: true, waiting_room: false }
    }
}

/// A fully validated meeting ready to submit to Zoom: `start_time_utc` is
/// already in `YYYY-MM-DDTHH:MM:SSZ` form.
#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub topic: String,
    pub start_time_utc: String,
    pub duration: i64,
    pub timezone: String,
    pub settings: MeetingSettings,
}

/// The subset of Zoom's meeting object this product returns to callers.
/// Fields are optional because Zoom omits some of them per account type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meeting {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub join_url: Option<String>,
    #[serde(default)]
    pub start_url: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
