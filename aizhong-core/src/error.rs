//! Error types for the aizhong core library.
//!
//! This module provides a unified error handling system for all operations
//! against the provider: the session pipeline, the data fetches, configuration
//! loading, and coordinator/registry lifecycle.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E1001-E1099 | Config | Environment, config file, and validation errors |
//! | E2001-E2099 | Authentication | Login, account switch, and authorization rejections |
//! | E3001-E3099 | Lookup | Customer record lookup failures |
//! | E4001-E4099 | Data fetch | Balance and interruption fetch rejections |
//! | E5001-E5099 | Transport | Network, timeout, and HTTP status errors |
//! | E6001-E6099 | Protocol | Unexpected response shapes and decode errors |
//! | E7001-E7099 | Coordinator | Refresh coordinator and registry lifecycle errors |
//! | E8001-E8099 | General | IO and serialization errors |

use thiserror::Error;
use tracing::{error, warn};

/// Per-request timeout applied to every provider exchange, in seconds.
///
/// A request that never responds must fail the cycle rather than hang, so the
/// HTTP client is always built with this timeout (overridable in
/// [`ProviderConfig`](crate::config::ProviderConfig)).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// The main error type for the aizhong core library.
///
/// Covers every failure a refresh cycle can surface. Provider-supplied
/// messages are preserved verbatim inside the variants so the coordinator can
/// report a human-readable cause chain.
#[derive(Debug, Error)]
pub enum AizhongError {
    // ========================================================================
    // Configuration Errors (E1001-E1099)
    // ========================================================================
    /// Required environment variable is missing
    #[error("[E1001] Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value
    #[error("[E1002] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    /// Configuration file parse error
    #[error("[E1003] Failed to parse configuration: {0}")]
    ConfigParseError(String),

    // ========================================================================
    // Authentication Errors (E2001-E2099)
    // ========================================================================
    /// The login step was rejected by the provider
    #[error("[E2001] Login rejected by provider: {0}")]
    LoginRejected(String),

    /// The account switch step was rejected by the provider
    #[error("[E2002] Account switch rejected by provider: {0}")]
    AccountSwitchRejected(String),

    /// The authorization exchange step was rejected by the provider
    #[error("[E2003] Authorization exchange rejected by provider: {0}")]
    AuthorizationRejected(String),

    // ========================================================================
    // Lookup Errors (E3001-E3099)
    // ========================================================================
    /// The customer lookup returned an empty record list
    #[error("[E3001] No customer information found for this account")]
    CustomerNotFound,

    /// The customer lookup step was rejected by the provider
    #[error("[E3002] Customer lookup rejected by provider: {0}")]
    CustomerLookupRejected(String),

    // ========================================================================
    // Data Fetch Errors (E4001-E4099)
    // ========================================================================
    /// The interruption fetch returned a non-success code
    #[error("[E4001] Interruption fetch rejected by provider: {0}")]
    InterruptionFetchRejected(String),

    // ========================================================================
    // Transport Errors (E5001-E5099)
    // ========================================================================
    /// HTTP request failed (status error or other transport-level failure)
    #[error("[E5001] Provider request failed: {0}")]
    RequestFailed(String),

    /// Could not reach the provider
    #[error("[E5002] Provider unreachable: {0}")]
    ServiceUnavailable(String),

    /// A provider request exceeded the per-request timeout
    #[error("[E5003] Provider request timed out after {0} seconds")]
    RequestTimeout(u64),

    // ========================================================================
    // Protocol Errors (E6001-E6099)
    // ========================================================================
    /// A successful-looking response was missing a required field
    #[error("[E6001] Unexpected response from {step}: missing {field}")]
    MissingField { step: String, field: String },

    /// The response body could not be decoded as JSON
    #[error("[E6002] Failed to decode provider response: {0}")]
    ResponseDecodeFailed(String),

    // ========================================================================
    // Coordinator Errors (E7001-E7099)
    // ========================================================================
    /// A coordinator is already registered under this entry id
    #[error("[E7001] Coordinator entry already exists: {0}")]
    EntryAlreadyExists(String),

    /// No coordinator is registered under this entry id
    #[error("[E7002] Coordinator entry not found: {0}")]
    EntryNotFound(String),

    /// The initial refresh performed at registration time failed
    #[error("[E7003] Initial refresh for entry '{entry}' failed: {message}")]
    InitialRefreshFailed { entry: String, message: String },

    /// The periodic refresh loop was started twice
    #[error("[E7004] Refresh loop for '{0}' is already running")]
    AlreadyRunning(String),

    // ========================================================================
    // General Errors (E8001-E8099)
    // ========================================================================
    /// IO operation failed
    #[error("[E8001] IO error: {0}")]
    IoError(String),

    /// JSON serialization/deserialization error
    #[error("[E8002] Serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias using AizhongError.
pub type AizhongResult<T> = Result<T, AizhongError>;

// ============================================================================
// From trait implementations for seamless error propagation
// ============================================================================

impl From<reqwest::Error> for AizhongError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AizhongError::RequestTimeout(DEFAULT_REQUEST_TIMEOUT_SECS)
        } else if err.is_connect() {
            AizhongError::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            AizhongError::ResponseDecodeFailed(err.to_string())
        } else {
            AizhongError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AizhongError {
    fn from(err: serde_json::Error) -> Self {
        AizhongError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for AizhongError {
    fn from(err: std::io::Error) -> Self {
        AizhongError::IoError(err.to_string())
    }
}

impl From<config::ConfigError> for AizhongError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => AizhongError::InvalidConfigValue {
                key,
                message: "Key not found".to_string(),
            },
            config::ConfigError::FileParse { uri, cause } => AizhongError::ConfigParseError(
                format!("Failed to parse {}: {}", uri.unwrap_or_default(), cause),
            ),
            config::ConfigError::Type {
                origin,
                unexpected,
                expected,
                key,
            } => AizhongError::InvalidConfigValue {
                key: key.unwrap_or_else(|| origin.map(|o| o.to_string()).unwrap_or_default()),
                message: format!("Expected {}, got {}", expected, unexpected),
            },
            _ => AizhongError::ConfigParseError(err.to_string()),
        }
    }
}

// ============================================================================
// Error categorization helpers
// ============================================================================

impl AizhongError {
    /// Shorthand for the protocol error raised when a success-coded response
    /// lacks a field the pipeline needs.
    pub fn missing_field(step: impl Into<String>, field: impl Into<String>) -> Self {
        AizhongError::MissingField {
            step: step.into(),
            field: field.into(),
        }
    }

    /// Returns true if this error is related to configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AizhongError::MissingEnvVar(_)
                | AizhongError::InvalidConfigValue { .. }
                | AizhongError::ConfigParseError(_)
        )
    }

    /// Returns true if a token-issuing pipeline step was rejected.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            AizhongError::LoginRejected(_)
                | AizhongError::AccountSwitchRejected(_)
                | AizhongError::AuthorizationRejected(_)
        )
    }

    /// Returns true if the customer lookup step failed.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            AizhongError::CustomerNotFound | AizhongError::CustomerLookupRejected(_)
        )
    }

    /// Returns true if a data fetch was rejected by the provider.
    pub fn is_data_fetch_failure(&self) -> bool {
        matches!(self, AizhongError::InterruptionFetchRejected(_))
    }

    /// Returns true if this is a network/timeout/HTTP-status level failure.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            AizhongError::RequestFailed(_)
                | AizhongError::ServiceUnavailable(_)
                | AizhongError::RequestTimeout(_)
        )
    }

    /// Returns true if the provider answered with an unexpected shape.
    pub fn is_protocol_failure(&self) -> bool {
        matches!(
            self,
            AizhongError::MissingField { .. } | AizhongError::ResponseDecodeFailed(_)
        )
    }

    /// Returns true if this error is transient and the next scheduled cycle
    /// might succeed without any change on the caller's side.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AizhongError::ServiceUnavailable(_) | AizhongError::RequestTimeout(_)
        )
    }

    /// Returns an error code suitable for logging or external reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            AizhongError::MissingEnvVar(_) => "E1001",
            AizhongError::InvalidConfigValue { .. } => "E1002",
            AizhongError::ConfigParseError(_) => "E1003",
            AizhongError::LoginRejected(_) => "E2001",
            AizhongError::AccountSwitchRejected(_) => "E2002",
            AizhongError::AuthorizationRejected(_) => "E2003",
            AizhongError::CustomerNotFound => "E3001",
            AizhongError::CustomerLookupRejected(_) => "E3002",
            AizhongError::InterruptionFetchRejected(_) => "E4001",
            AizhongError::RequestFailed(_) => "E5001",
            AizhongError::ServiceUnavailable(_) => "E5002",
            AizhongError::RequestTimeout(_) => "E5003",
            AizhongError::MissingField { .. } => "E6001",
            AizhongError::ResponseDecodeFailed(_) => "E6002",
            AizhongError::EntryAlreadyExists(_) => "E7001",
            AizhongError::EntryNotFound(_) => "E7002",
            AizhongError::InitialRefreshFailed { .. } => "E7003",
            AizhongError::AlreadyRunning(_) => "E7004",
            AizhongError::IoError(_) => "E8001",
            AizhongError::SerializationError(_) => "E8002",
        }
    }

    /// Returns a user-facing suggestion for resolving this error, if one exists.
    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            AizhongError::MissingEnvVar(_) => {
                Some("Create a .env file or set the environment variable")
            }
            AizhongError::LoginRejected(_) => {
                Some("Check AIZHONG_PHONE and AIZHONG_PASSWORD in your configuration")
            }
            AizhongError::CustomerNotFound => {
                Some("Verify the phone number is bound to a customer account with the provider")
            }
            AizhongError::ServiceUnavailable(_) => {
                Some("The provider may be down; the next cycle will try again")
            }
            AizhongError::RequestTimeout(_) => {
                Some("The provider is responding slowly; consider raising the request timeout")
            }
            AizhongError::EntryAlreadyExists(_) => {
                Some("Unregister the existing entry before registering it again")
            }
            _ => None,
        }
    }

    /// Log this error at a severity matching its category.
    pub fn log(&self) {
        let code = self.error_code();
        let suggestion = self.user_suggestion();

        if self.is_transient() {
            warn!(
                error_code = %code,
                suggestion = suggestion,
                "Transient error occurred: {}",
                self
            );
        } else {
            error!(
                error_code = %code,
                suggestion = suggestion,
                "Error occurred: {}",
                self
            );
        }
    }
}
