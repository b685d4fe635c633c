//! Session persistence for meetkit conversations.
//!
//! A [`Session`] is a conversation's identity, state, and event log. The
//! [`SessionService`] trait abstracts over storage; [`InMemorySessionService`]
//! serves tests and throwaway runs, [`DatabaseSessionService`] keeps sessions
//! in SQLite. [`service_from_uri`] picks a backend from a
//! `--session_service_uri` value such as `sqlite:///sessions.db`.

pub mod database;
pub mod inmemory;
pub mod service;
pub mod session;
pub mod uri;

pub use database::DatabaseSessionService;
pub use inmemory::InMemorySessionService;
pub use service::{CreateRequest, DeleteRequest, GetRequest, ListRequest, SessionService};
pub use session::Session;
pub use uri::{SessionBackend, service_from_uri};
