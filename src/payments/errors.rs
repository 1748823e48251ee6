use crate::payments::codes::{lookup_error_code, lookup_result_code, ErrorCodeEntry, ResultCodeEntry};
use thiserror::Error;

pub type SepResult<T> = Result<T, SepError>;

/// Code reported when the gateway gave us nothing to classify.
pub const UNKNOWN_CODE: &str = "UNKNOWN";

/// Description paired with [`UNKNOWN_CODE`] for an empty gateway reply.
pub const NO_RESPONSE_DESCRIPTION: &str = "no response received";

#[derive(Debug, Error)]
pub enum SepError {
    /// The HTTP exchange itself could not be completed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The gateway answered, and the answer says the operation failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl SepError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Returns the gateway error when the failure was reported by the gateway.
    pub fn as_gateway(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(err) => Some(err),
            _ => None,
        }
    }

    /// Failure reported by the gateway itself.
    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }

    /// The HTTP exchange failed before the gateway could answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Operator error; retrying will not help.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Catalog documentation resolved for a failure code.
///
/// Resolution is advisory: the raw code and description on [`GatewayError`]
/// are authoritative, this only names the code when we know it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEntry {
    Error(&'static ErrorCodeEntry),
    Result(&'static ResultCodeEntry),
}

impl CatalogEntry {
    /// Short English name of the documented code.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Error(entry) => entry.name,
            Self::Result(entry) => entry.name,
        }
    }
}

/// A failure reported by the gateway, in one shape for all three operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("SEP Gateway Error [{code}]: {description}")]
pub struct GatewayError {
    pub code: String,
    pub description: String,
    pub catalog_entry: Option<CatalogEntry>,
}

impl GatewayError {
    /// Error with no catalog entry attached.
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            catalog_entry: None,
        }
    }

    /// The gateway replied with an empty body.
    pub fn no_response() -> Self {
        Self::new(UNKNOWN_CODE, NO_RESPONSE_DESCRIPTION)
    }

    /// Token issuance failure, resolved against the error code catalog.
    pub fn from_error_code(code: impl Into<String>, description: impl Into<String>) -> Self {
        let code = code.into();
        let catalog_entry = lookup_error_code(&code).map(CatalogEntry::Error);
        Self {
            code,
            description: description.into(),
            catalog_entry,
        }
    }

    /// Verify/reverse failure, resolved against the result code catalog.
    ///
    /// A missing result code is reported as [`UNKNOWN_CODE`].
    pub fn from_result_code(result_code: Option<i32>, description: impl Into<String>) -> Self {
        let (code, catalog_entry) = match result_code {
            Some(code) => (
                code.to_string(),
                lookup_result_code(code).map(CatalogEntry::Result),
            ),
            None => (UNKNOWN_CODE.to_string(), None),
        };
        Self {
            code,
            description: description.into(),
            catalog_entry,
        }
    }

    /// Catalog entry when the code resolved against the error code catalog.
    pub fn error_code_entry(&self) -> Option<&'static ErrorCodeEntry> {
        match self.catalog_entry {
            Some(CatalogEntry::Error(entry)) => Some(entry),
            _ => None,
        }
    }

    /// Catalog entry when the code resolved against the result code catalog.
    pub fn result_code_entry(&self) -> Option<&'static ResultCodeEntry> {
        match self.catalog_entry {
            Some(CatalogEntry::Result(entry)) => Some(entry),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Timeout error: request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl TransportError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Map a reqwest failure; `timeout_secs` is the client's configured timeout.
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                seconds: timeout_secs,
            }
        } else if let Some(status) = err.status() {
            TransportError::status(status.as_u16(), err.to_string())
        } else if err.is_decode() {
            TransportError::serialization(format!("Response decode error: {}", err))
        } else {
            TransportError::network(format!("Request error: {}", err))
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::serialization(format!("JSON error: {}", err))
    }
}
