//! # MeetKit Telemetry
//!
//! Structured logging for MeetKit services, built on `tracing`.
//!
//! Call [`init_telemetry`] once at startup, then use the re-exported macros
//! everywhere else:
//!
//! ```rust
//! use meetkit_telemetry::{init_telemetry, info};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_telemetry("meetkit-web")?;
//!     info!("ready");
//!     Ok(())
//! }
//! ```
//!
//! Log verbosity follows `RUST_LOG` and defaults to `info`.

pub mod init;

// Re-export tracing macros for convenience
pub use tracing::{Span, debug, error, info, instrument, trace, warn};

pub use init::init_telemetry;
