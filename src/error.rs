use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use aws_smithy_types::error::operation::BuildError;
use std::fmt::Debug;

/// The service error code returned when a resource does not exist.
pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";

#[derive(Debug, thiserror::Error)]
pub enum CloudAiError {
    /// The service received the request and rejected it.
    #[error("Service error {code}: {message}")]
    Service { code: String, message: String },
    /// The request never produced a service response (dispatch, timeout, parsing).
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("{resource} reached failure status {status}{}", message_suffix(.message))]
    StatusFailed {
        resource: String,
        status: String,
        message: Option<String>,
    },
    #[error("Unexpected status {status} for {resource}")]
    UnexpectedStatus { resource: String, status: String },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid request: {0}")]
    Build(#[from] BuildError),
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Response text is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Object body could not be read: {0}")]
    ByteStream(#[from] aws_sdk_s3::primitives::ByteStreamError),
}

pub type Result<T> = std::result::Result<T, CloudAiError>;

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl CloudAiError {
    /// Builds a service error, as the stub clients in tests do.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The vendor error code, when the service rejected the call.
    pub fn service_code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.service_code() == Some(RESOURCE_NOT_FOUND)
    }
}

impl<E, R> From<SdkError<E, R>> for CloudAiError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    fn from(err: SdkError<E, R>) -> Self {
        match err.as_service_error() {
            Some(service) => Self::Service {
                code: service.code().unwrap_or("Unknown").to_string(),
                message: service.message().unwrap_or_default().to_string(),
            },
            None => Self::Transport(DisplayErrorContext(&err).to_string()),
        }
    }
}
