pub mod chat;
pub mod oauth;
pub mod schedule;

pub use chat::ChatController;
pub use oauth::OauthController;
pub use schedule::ScheduleController;
