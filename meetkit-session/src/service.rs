use crate::Session;
use async_trait::async_trait;
use meetkit_core::{Event, Result};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    pub app_name: String,
    pub user_id: String,
    /// When `None` the service generates a UUID.
    pub session_id: Option<String>,
    pub state: HashMap<String, Value>,
}

#[derive(Debug, Clone)]
pub struct GetRequest {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

#[derive(Debug, Clone)]
pub struct ListRequest {
    pub app_name: String,
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

/// Storage backend for sessions.
///
/// `append_event` applies the event's `state_delta` to the session state and
/// advances `updated_at` to the event timestamp, so `list` orders by recency.
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn create(&self, req: CreateRequest) -> Result<Session>;
    async fn get(&self, req: GetRequest) -> Result<Session>;
    /// Sessions for one app/user pair, most recently updated first, without
    /// their event logs.
    async fn list(&self, req: ListRequest) -> Result<Vec<Session>>;
    async fn delete(&self, req: DeleteRequest) -> Result<()>;
    async fn append_event(&self, session_id: &str, event: Event) -> Result<()>;
}
