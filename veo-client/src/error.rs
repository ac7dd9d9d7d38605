//! Error types for the Veo client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Veo client
#[derive(Debug, Error)]
pub enum ClientError {
    /// No bearer credential could be obtained
    #[error("Authentication required: {0}")]
    Auth(String),

    /// The generation request was rejected
    #[error("Failed to generate video (status {status}): {message}")]
    Submission {
        /// HTTP status code
        status: u16,
        /// Raw response body
        message: String,
    },

    /// A status query was rejected
    #[error("Failed to check operation status (status {status}): {message}")]
    StatusCheck {
        /// HTTP status code
        status: u16,
        /// Raw response body
        message: String,
    },

    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create a submission error from status code and message
    pub fn submission(status: u16, message: impl Into<String>) -> Self {
        Self::Submission {
            status,
            message: message.into(),
        }
    }

    /// Create a status check error from status code and message
    pub fn status_check(status: u16, message: impl Into<String>) -> Self {
        Self::StatusCheck {
            status,
            message: message.into(),
        }
    }

    /// HTTP status returned by the API, if the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Submission { status, .. } | Self::StatusCheck { status, .. } => Some(*status),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a missing credential
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Auth(_)) || self.status() == Some(401)
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }

    /// Check if the project has not enabled the Vertex AI API
    pub fn is_api_not_enabled(&self) -> bool {
        match self {
            Self::Submission { status: 403, message }
            | Self::StatusCheck { status: 403, message } => {
                message.contains("has not been used") || message.contains("is disabled")
            }
            _ => false,
        }
    }

    /// User-facing remediation for well-known failures
    pub fn hint(&self) -> Option<String> {
        if self.is_api_not_enabled() {
            let enable_url = match self.project_from_message() {
                Some(project) => format!(
                    "https://console.developers.google.com/apis/api/aiplatform.googleapis.com/overview?project={}",
                    project
                ),
                None => "https://console.developers.google.com/apis/api/aiplatform.googleapis.com/overview".to_string(),
            };
            return Some(format!(
                "Enable the Vertex AI API at {} and retry after a few minutes",
                enable_url
            ));
        }

        if self.is_auth_error() {
            return Some(
                "Run `gcloud auth login` or set GOOGLE_CLOUD_ACCESS_TOKEN".to_string(),
            );
        }

        if self.status() == Some(403) {
            return Some("Check the project's IAM permissions for Vertex AI".to_string());
        }

        None
    }

    fn project_from_message(&self) -> Option<&str> {
        let message = match self {
            Self::Submission { message, .. } | Self::StatusCheck { message, .. } => message,
            _ => return None,
        };

        let rest = &message[message.find("project ")? + "project ".len()..];
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(rest.len());

        (end > 0).then(|| &rest[..end])
    }
}
