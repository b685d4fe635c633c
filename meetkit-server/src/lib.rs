//! HTTP server for meetkit.
//!
//! Three surfaces share one router: a browser chat UI backed by the agent
//! runner, a JSON scheduling API that books Zoom meetings directly, and
//! the OAuth pages that mint the Zoom token on first use.
//!
//! ```no_run
//! use meetkit_server::{ServerConfig, create_app};
//! # fn demo(runner: std::sync::Arc<meetkit_runner::Runner>,
//! #         oauth: std::sync::Arc<meetkit_zoom::ZoomOauth>,
//! #         meetings: std::sync::Arc<meetkit_zoom::MeetingsClient>) {
//! let config = ServerConfig::new(runner, oauth, meetings)
//!     .with_public_base_url("http://localhost:8888");
//! let app = create_app(config);
//! # }
//! ```

pub mod app;
pub mod config;
pub mod controllers;
pub mod ratelimit;

pub use app::create_app;
pub use config::{
    DEFAULT_PUBLIC_BASE_URL, DEFAULT_USER_ID, RateLimitConfig, SecurityConfig, ServerConfig,
};
pub use ratelimit::{RateDecision, RateLimiter};
