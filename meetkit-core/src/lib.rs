//! # meetkit-core
//!
//! Core traits and types shared by every meetkit crate.
//!
//! ## Overview
//!
//! - [`Content`] / [`Part`] - conversation turns in the Gemini wire format
//! - [`Event`] - one persisted interaction (user, model, or tool)
//! - [`Llm`] - model abstraction answered by `meetkit-model`
//! - [`Tool`] - capabilities the model may call by name
//! - [`Agent`] - turns an invocation into a stream of events
//! - [`MeetkitError`] / [`Result`] - the workspace error type

pub mod agent;
pub mod context;
pub mod error;
pub mod event;
pub mod model;
pub mod tool;
pub mod types;

pub use agent::{Agent, EventStream};
pub use context::InvocationContext;
pub use error::{MeetkitError, Result};
pub use event::{Event, EventActions};
pub use model::{
    FinishReason, GenerateContentConfig, Llm, LlmRequest, LlmResponse, UsageMetadata,
};
pub use tool::{Tool, ToolContext};
pub use types::{Content, FunctionCallData, FunctionResponseData, Part};
