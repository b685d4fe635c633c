#[derive(Debug, thiserror::Error)]
pub enum MeetkitError {
    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Zoom API error: {0}")]
    Zoom(String),

    #[error("Zoom API returned {status}: {message}")]
    ZoomApi { status: u16, message: String },

    #[error("Authorization required: {0}")]
    AuthRequired(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rate limited, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MeetkitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeetkitError::Zoom("token exchange failed".to_string());
        assert_eq!(err.to_string(), "Zoom API error: token exchange failed");
    }

    #[test]
    fn test_rate_limited_display() {
        let err = MeetkitError::RateLimited { retry_after: 60 };
        assert_eq!(err.to_string(), "Rate limited, retry after 60s");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MeetkitError = io_err.into();
        assert!(matches!(err, MeetkitError::Io(_)));
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert_eq!(ok_result.unwrap(), 42);

        let err_result: Result<i32> = Err(MeetkitError::Config("invalid".to_string()));
        assert!(err_result.is_err());
    }
}
