//! Built-in tools for the scheduler agent.

mod convert_to_iso;
mod schedule_meeting;

pub use convert_to_iso::ConvertToIsoTool;
pub use schedule_meeting::ScheduleMeetingTool;
