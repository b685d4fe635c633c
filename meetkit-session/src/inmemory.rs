use crate::{CreateRequest, DeleteRequest, GetRequest, ListRequest, Session, SessionService};
use async_trait::async_trait;
use meetkit_core::{Event, MeetkitError, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

fn key(app_name: &str, user_id: &str, session_id: &str) -> String {
    format!("{}:{}:{}", app_name, user_id, session_id)
}

/// Process-local session store. Everything is lost on restart; use the
/// SQLite backend when sessions must survive.
pub struct InMemorySessionService {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())) }
    }
}

impl Default for InMemorySessionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn create(&self, req: CreateRequest) -> Result<Session> {
        let session_id = req.session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let key = key(&req.app_name, &req.user_id, &session_id);

        let mut sessions = self.sessions.write().unwrap();
        if sessions.contains_key(&key) {
            return Err(MeetkitError::Session(format!("session already exists: {session_id}")));
        }

        let mut session = Session::new(session_id, req.app_name, req.user_id);
        session.state = req.state;
        sessions.insert(key, session.clone());

        Ok(session)
    }

    async fn get(&self, req: GetRequest) -> Result<Session> {
        let sessions = self.sessions.read().unwrap();
        sessions
            .get(&key(&req.app_name, &req.user_id, &req.session_id))
            .cloned()
            .ok_or_else(|| MeetkitError::Session("session not found".into()))
    }

    async fn list(&self, req: ListRequest) -> Result<Vec<Session>> {
        let sessions = self.sessions.read().unwrap();
        let mut result: Vec<Session> = sessions
            .values()
            .filter(|s| s.app_name == req.app_name && s.user_id == req.user_id)
            .map(|s| Session { events: Vec::new(), ..s.clone() })
            .collect();
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(result)
    }

    async fn delete(&self, req: DeleteRequest) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(&key(&req.app_name, &req.user_id, &req.session_id));
        Ok(())
    }

    async fn append_event(&self, session_id: &str, event: Event) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions
            .values_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| MeetkitError::Session("session not found".into()))?;

        session.state.extend(event.actions.state_delta.clone());
        session.updated_at = event.timestamp;
        session.events.push(event);

        Ok(())
    }
}
