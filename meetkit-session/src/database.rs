use crate::{CreateRequest, DeleteRequest, GetRequest, ListRequest, Session, SessionService};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meetkit_core::{Content, Event, EventActions, MeetkitError, Result};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

/// SQLite-backed session store. Sessions and their event logs survive
/// restarts; call [`migrate`](DatabaseSessionService::migrate) once before
/// first use.
pub struct DatabaseSessionService {
    pool: SqlitePool,
}

impl DatabaseSessionService {
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(path.as_ref()).create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await.map_err(|e| {
            MeetkitError::Session(format!("database connection failed: {}", e))
        })?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                app_name TEXT NOT NULL,
                user_id TEXT NOT NULL,
                session_id TEXT NOT NULL,
                state TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (app_name, user_id, session_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| MeetkitError::Session(format!("migration failed: {}", e)))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id TEXT NOT NULL,
                session_id TEXT NOT NULL,
                seq INTEGER NOT NULL,
                invocation_id TEXT NOT NULL,
                author TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                content TEXT NOT NULL,
                actions TEXT NOT NULL,
                PRIMARY KEY (session_id, seq)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| MeetkitError::Session(format!("migration failed: {}", e)))?;

        Ok(())
    }

    async fn load_events(&self, session_id: &str) -> Result<Vec<Event>> {
        let rows = sqlx::query(
            "SELECT id, invocation_id, author, timestamp, content, actions \
             FROM events WHERE session_id = ? ORDER BY seq",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MeetkitError::Session(format!("query failed: {}", e)))?;

        // Rows that fail to decode are dropped rather than failing the load.
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let content: Option<Content> = serde_json::from_str(row.get("content")).ok()?;
                let actions: EventActions = serde_json::from_str(row.get("actions")).ok()?;
                let timestamp: String = row.get("timestamp");
                let timestamp =
                    DateTime::parse_from_rfc3339(&timestamp).ok()?.with_timezone(&Utc);
                Some(Event {
                    id: row.get("id"),
                    timestamp,
                    invocation_id: row.get("invocation_id"),
                    author: row.get("author"),
                    content,
                    actions,
                })
            })
            .collect())
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl SessionService for DatabaseSessionService {
    async fn create(&self, req: CreateRequest) -> Result<Session> {
        let session_id = req.session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let now = Utc::now();

        let state_json = serde_json::to_string(&req.state)
            .map_err(|e| MeetkitError::Session(format!("serialize failed: {}", e)))?;

        sqlx::query(
            "INSERT INTO sessions (app_name, user_id, session_id, state, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&req.app_name)
        .bind(&req.user_id)
        .bind(&session_id)
        .bind(&state_json)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| MeetkitError::Session(format!("insert failed: {}", e)))?;

        Ok(Session {
            id: session_id,
            app_name: req.app_name,
            user_id: req.user_id,
            state: req.state,
            events: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, req: GetRequest) -> Result<Session> {
        let row = sqlx::query(
            "SELECT state, created_at, updated_at FROM sessions \
             WHERE app_name = ? AND user_id = ? AND session_id = ?",
        )
        .bind(&req.app_name)
        .bind(&req.user_id)
        .bind(&req.session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| MeetkitError::Session(format!("query failed: {}", e)))?
        .ok_or_else(|| MeetkitError::Session("session not found".into()))?;

        let state: HashMap<String, Value> =
            serde_json::from_str(row.get("state")).unwrap_or_default();
        let created_at = parse_timestamp(row.get("created_at"));
        let updated_at = parse_timestamp(row.get("updated_at"));

        let events = self.load_events(&req.session_id).await?;

        Ok(Session {
            id: req.session_id,
            app_name: req.app_name,
            user_id: req.user_id,
            state,
            events,
            created_at,
            updated_at,
        })
    }

    async fn list(&self, req: ListRequest) -> Result<Vec<Session>> {
        let rows = sqlx::query(
            "SELECT session_id, state, created_at, updated_at FROM sessions \
             WHERE app_name = ? AND user_id = ? ORDER BY updated_at DESC",
        )
        .bind(&req.app_name)
        .bind(&req.user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MeetkitError::Session(format!("query failed: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| Session {
                id: row.get("session_id"),
                app_name: req.app_name.clone(),
                user_id: req.user_id.clone(),
                state: serde_json::from_str(row.get("state")).unwrap_or_default(),
                events: Vec::new(),
                created_at: parse_timestamp(row.get("created_at")),
                updated_at: parse_timestamp(row.get("updated_at")),
            })
            .collect())
    }

    async fn delete(&self, req: DeleteRequest) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| MeetkitError::Session(format!("transaction failed: {}", e)))?;

        sqlx::query("DELETE FROM events WHERE session_id = ?")
            .bind(&req.session_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| MeetkitError::Session(format!("delete failed: {}", e)))?;

        sqlx::query(
            "DELETE FROM sessions WHERE app_name = ? AND user_id = ? AND session_id = ?",
        )
        .bind(&req.app_name)
        .bind(&req.user_id)
        .bind(&req.session_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| MeetkitError::Session(format!("delete failed: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| MeetkitError::Session(format!("commit failed: {}", e)))?;

        Ok(())
    }

    async fn append_event(&self, session_id: &str, event: Event) -> Result<()> {
        let content_json = serde_json::to_string(&event.content)
            .map_err(|e| MeetkitError::Session(format!("serialize failed: {}", e)))?;
        let actions_json = serde_json::to_string(&event.actions)
            .map_err(|e| MeetkitError::Session(format!("serialize failed: {}", e)))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| MeetkitError::Session(format!("transaction failed: {}", e)))?;

        let row = sqlx::query("SELECT state FROM sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| MeetkitError::Session(format!("query failed: {}", e)))?
            .ok_or_else(|| MeetkitError::Session("session not found".into()))?;

        let state_json = if event.actions.state_delta.is_empty() {
            None
        } else {
            let mut state: HashMap<String, Value> =
                serde_json::from_str(row.get("state")).unwrap_or_default();
            state.extend(event.actions.state_delta.clone());
            Some(
                serde_json::to_string(&state)
                    .map_err(|e| MeetkitError::Session(format!("serialize failed: {}", e)))?,
            )
        };

        let seq: i64 = sqlx::query("SELECT COALESCE(MAX(seq) + 1, 0) FROM events WHERE session_id = ?")
            .bind(session_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| MeetkitError::Session(format!("query failed: {}", e)))?
            .get(0);

        sqlx::query(
            "INSERT INTO events (id, session_id, seq, invocation_id, author, timestamp, content, actions) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&event.id)
        .bind(session_id)
        .bind(seq)
        .bind(&event.invocation_id)
        .bind(&event.author)
        .bind(event.timestamp.to_rfc3339())
        .bind(&content_json)
        .bind(&actions_json)
        .execute(&mut *tx)
        .await
        .map_err(|e| MeetkitError::Session(format!("insert failed: {}", e)))?;

        if let Some(state_json) = state_json {
            sqlx::query("UPDATE sessions SET state = ?, updated_at = ? WHERE session_id = ?")
                .bind(&state_json)
                .bind(event.timestamp.to_rfc3339())
                .bind(session_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| MeetkitError::Session(format!("update failed: {}", e)))?;
        } else {
            sqlx::query("UPDATE sessions SET updated_at = ? WHERE session_id = ?")
                .bind(event.timestamp.to_rfc3339())
                .bind(session_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| MeetkitError::Session(format!("update failed: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| MeetkitError::Session(format!("commit failed: {}", e)))?;

        Ok(())
    }
}
