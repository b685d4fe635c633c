//! # meetkit-zoom
//!
//! Zoom integration: the OAuth2 authorization-code flow with a file-backed
//! token cache, the Meetings API client, and the start-time/timezone
//! handling meeting requests go through.

pub mod config;
pub mod meetings;
pub mod oauth;
pub mod time;
pub mod token;
pub mod types;

pub use config::{DEFAULT_REDIRECT_URI, ZOOM_API_BASE, ZOOM_AUTH_BASE, ZoomConfig};
pub use meetings::MeetingsClient;
pub use oauth::ZoomOauth;
pub use time::{parse_in_zone, pretty_local, to_zoom_start_time, validate_timezone};
pub use token::{DEFAULT_TOKEN_FILE, OauthToken, TokenStore};
pub use types::{Meeting, MeetingRequest, MeetingSettings, NewMeeting};
