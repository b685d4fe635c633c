//! # meetkit-tool
//!
//! Tool system for meetkit agents: the generic [`FunctionTool`] wrapper and
//! the scheduling built-ins ([`ScheduleMeetingTool`], [`ConvertToIsoTool`])
//! the production agent registers.

pub mod builtin;
pub mod function_tool;

pub use builtin::{ConvertToIsoTool, ScheduleMeetingTool};
pub use function_tool::FunctionTool;
