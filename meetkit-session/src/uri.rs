use crate::{DatabaseSessionService, InMemorySessionService, SessionService};
use meetkit_core::{MeetkitError, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Parsed form of a `--session_service_uri` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    Sqlite(PathBuf),
}

impl SessionBackend {
    /// `memory`, `memory://`, and a bare `sqlite://` select the in-process
    /// store. `sqlite:///app.db` is the file `app.db` relative to the working
    /// directory; `sqlite:////var/lib/meetkit/app.db` is absolute.
    pub fn parse(uri: &str) -> Result<Self> {
        if uri == "memory" || uri == "memory://" {
            return Ok(Self::Memory);
        }

        if let Some(rest) = uri.strip_prefix("sqlite://") {
            if let Some(abs) = rest.strip_prefix("//") {
                return Ok(Self::Sqlite(PathBuf::from(format!("/{}", abs))));
            }
            let path = rest.trim_start_matches('/');
            if path.is_empty() {
                return Ok(Self::Memory);
            }
            return Ok(Self::Sqlite(PathBuf::from(path)));
        }

        Err(MeetkitError::Config(format!("Unsupported session service URI: {uri}")))
    }
}

/// Build a session service from a URI, running migrations for SQLite.
pub async fn service_from_uri(uri: &str) -> Result<Arc<dyn SessionService>> {
    match SessionBackend::parse(uri)? {
        SessionBackend::Memory => {
            tracing::info!("Using in-memory session service");
            Ok(Arc::new(InMemorySessionService::new()))
        }
        SessionBackend::Sqlite(path) => {
            tracing::info!(path = %path.display(), "Using SQLite session service");
            let service = DatabaseSessionService::new(&path).await?;
            service.migrate().await?;
            Ok(Arc::new(service))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_uris() {
        assert_eq!(SessionBackend::parse("memory").unwrap(), SessionBackend::Memory);
        assert_eq!(SessionBackend::parse("memory://").unwrap(), SessionBackend::Memory);
        assert_eq!(SessionBackend::parse("sqlite://").unwrap(), SessionBackend::Memory);
    }

    #[test]
    fn test_relative_sqlite_path() {
        assert_eq!(
            SessionBackend::parse("sqlite:///sessions.db").unwrap(),
            SessionBackend::Sqlite(PathBuf::from("sessions.db"))
        );
    }

    #[test]
    fn test_absolute_sqlite_path() {
        assert_eq!(
            SessionBackend::parse("sqlite:////var/lib/meetkit/app.db").unwrap(),
            SessionBackend::Sqlite(PathBuf::from("/var/lib/meetkit/app.db"))
        );
    }

    #[test]
    fn test_unknown_scheme() {
        let err = SessionBackend::parse("postgres://db/meetkit").unwrap_err();
        assert!(err.to_string().contains("Unsupported session service URI"));
    }

    #[tokio::test]
    async fn test_service_from_memory_uri() {
        let service = service_from_uri("memory").await.unwrap();
        let session = service
            .create(crate::CreateRequest {
                app_name: "meetkit".into(),
                user_id: "u1".into(),
                session_id: None,
                state: Default::default(),
            })
            .await
            .unwrap();
        assert!(!session.id.is_empty());
    }
}
