use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentPrError {
    #[error("{0}")]
    Input(String),

    #[error("{0}")]
    Reference(String),

    #[error("GitHub API error: {message}")]
    Api { status: Option<u16>, message: String },

    #[error("An agent already replied to this thread")]
    DuplicateReply { comment_id: u64 },

    #[error("{message}")]
    Validation {
        index: Option<usize>,
        field: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AgentPrError>;

/// Coarse error category reported to callers alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Input,
    Reference,
    Api,
    Duplicate,
    Validation,
    Config,
}

impl AgentPrError {
    /// Build an API error from an upstream status code and message.
    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        AgentPrError::Api {
            status,
            message: message.into(),
        }
    }

    /// Build a validation error for the inline comment at `index`.
    pub fn validation(index: usize, field: &str, message: impl AsRef<str>) -> Self {
        AgentPrError::Validation {
            index: Some(index),
            field: field.to_string(),
            message: format!("Comment {}: {}", index, message.as_ref()),
        }
    }

    /// Build a validation error about the comments collection as a whole.
    pub fn invalid_comments(message: impl Into<String>) -> Self {
        AgentPrError::Validation {
            index: None,
            field: "comments".to_string(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AgentPrError::Input(_) | AgentPrError::Json(_) | AgentPrError::Io(_) => {
                ErrorKind::Input
            }
            AgentPrError::Reference(_) => ErrorKind::Reference,
            AgentPrError::Api { .. } => ErrorKind::Api,
            AgentPrError::DuplicateReply { .. } => ErrorKind::Duplicate,
            AgentPrError::Validation { .. } => ErrorKind::Validation,
            AgentPrError::Config(_) => ErrorKind::Config,
        }
    }

    /// Process exit status for this error.
    ///
    /// 1 = caller input invalid, 2 = remote API failure,
    /// 3 = duplicate reply or payload validation conflict.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Input | ErrorKind::Reference | ErrorKind::Config => 1,
            ErrorKind::Api => 2,
            ErrorKind::Duplicate | ErrorKind::Validation => 3,
        }
    }

    /// Upstream HTTP status, when the error came from the remote endpoint.
    pub fn status(&self) -> Option<u16> {
        match self {
            AgentPrError::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Human guidance for the frequently seen API failures.
    pub fn hint(&self) -> Option<&'static str> {
        match self.status()? {
            404 => Some("Check that the PR exists and you have access to it."),
            422 => Some("Check comment line numbers are within the diff."),
            401 | 403 => Some("Check your GitHub authentication (gh auth status)."),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_error_kind() {
        assert_eq!(AgentPrError::Input("missing pr".into()).exit_code(), 1);
        assert_eq!(AgentPrError::Reference("abc".into()).exit_code(), 1);
        assert_eq!(AgentPrError::Config("bad".into()).exit_code(), 1);
        assert_eq!(AgentPrError::api(Some(500), "boom").exit_code(), 2);
        assert_eq!(
            AgentPrError::DuplicateReply { comment_id: 1 }.exit_code(),
            3
        );
        assert_eq!(AgentPrError::validation(0, "line", "bad").exit_code(), 3);
    }

    #[test]
    fn test_json_errors_are_input_errors() {
        let err: AgentPrError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(err.to_string().starts_with("Invalid JSON input"));
    }

    #[test]
    fn test_hints_for_common_statuses() {
        assert!(AgentPrError::api(Some(404), "Not Found")
            .hint()
            .unwrap()
            .contains("PR exists"));
        assert!(AgentPrError::api(Some(422), "Unprocessable")
            .hint()
            .unwrap()
            .contains("within the diff"));
        assert!(AgentPrError::api(Some(401), "Bad credentials")
            .hint()
            .unwrap()
            .contains("gh auth status"));
        assert!(AgentPrError::api(Some(403), "Forbidden").hint().is_some());
        assert!(AgentPrError::api(Some(500), "oops").hint().is_none());
        assert!(AgentPrError::api(None, "gh missing").hint().is_none());
        assert!(AgentPrError::Input("x".into()).hint().is_none());
    }

    #[test]
    fn test_api_error_keeps_upstream_message() {
        let err = AgentPrError::api(Some(422), "pull_request_review_thread.line must be part of the diff");
        assert!(err.to_string().contains("must be part of the diff"));
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_validation_error_names_index() {
        let err = AgentPrError::validation(2, "body", "'body' cannot be empty");
        assert_eq!(err.to_string(), "Comment 2: 'body' cannot be empty");
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = AgentPrError::invalid_comments("Comments file must contain a JSON array");
        assert_eq!(err.exit_code(), 3);
        assert!(matches!(err, AgentPrError::Validation { index: None, .. }));
    }
}
