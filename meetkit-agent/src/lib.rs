mod llm_agent;
mod scheduler;

pub use llm_agent::{DEFAULT_MAX_ITERATIONS, LlmAgent, LlmAgentBuilder};
pub use meetkit_core::Agent;
pub use scheduler::{SCHEDULER_INSTRUCTION, scheduler_agent};
