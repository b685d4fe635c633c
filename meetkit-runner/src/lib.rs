mod context;
mod runner;

pub use context::RunContext;
pub use runner::{Runner, RunnerConfig};
