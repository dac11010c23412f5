use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for every TXT record operation.
///
/// The console offers no machine-readable error codes, so every variant is
/// derived either from the transport or from markers found (or missing) in
/// the returned HTML. All variants are serializable for structured reporting.
///
/// Nothing in this crate retries. Transient variants
/// ([`Network`](Self::Network), [`Timeout`](Self::Timeout)) are left to the
/// caller's retry policy.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// The solver configuration is invalid (unknown method, malformed JSON, ...).
    #[error("Invalid configuration: {detail}")]
    Config {
        /// What is wrong with the configuration.
        detail: String,
    },

    /// Credential material is missing or empty.
    #[error("Credential error: {detail}")]
    Credential {
        /// Which credential could not be resolved.
        detail: String,
    },

    /// A network-level error occurred (connection refused, TLS failure, ...).
    #[error("Network error: {detail}")]
    Network {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out at the transport layer.
    #[error("Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The console rejected the username/password pair.
    #[error("Login failed (invalid credentials?)")]
    Authentication {
        /// Original marker or message, if available.
        raw_message: Option<String>,
    },

    /// The zone listing does not contain the requested domain.
    #[error("Domain '{domain}' not found")]
    ZoneNotFound {
        /// Domain that was looked up.
        domain: String,
    },

    /// The zone detail page has no TXT row carrying the requested value.
    #[error("Record '{record_name}' not found in zone")]
    RecordNotFound {
        /// Fully qualified record name that was looked up.
        record_name: String,
    },

    /// A page other than the expected one was returned.
    #[error("Unexpected page: cannot find '{expected}'")]
    UnexpectedPage {
        /// Marker that should have been present.
        expected: String,
    },

    /// A form was submitted but the outcome marker or status is wrong.
    #[error("Submission failed: {detail}")]
    Submission {
        /// Status or body excerpt explaining the failure.
        detail: String,
    },

    /// The returned markup could not be interpreted.
    #[error("Parse error: {detail}")]
    Parse {
        /// Details about the parse failure.
        detail: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::Credential { .. }
                | Self::Authentication { .. }
                | Self::ZoneNotFound { .. }
                | Self::RecordNotFound { .. }
        )
    }

    /// Whether the zone or the record could not be located in the console.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ZoneNotFound { .. } | Self::RecordNotFound { .. }
        )
    }

    pub(crate) fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub(crate) fn credential(detail: impl Into<String>) -> Self {
        Self::Credential {
            detail: detail.into(),
        }
    }

    pub(crate) fn submission(detail: impl Into<String>) -> Self {
        Self::Submission {
            detail: detail.into(),
        }
    }

    pub(crate) fn parse(detail: impl Into<String>) -> Self {
        Self::Parse {
            detail: detail.into(),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout {
                detail: e.to_string(),
            }
        } else {
            Self::Network {
                detail: e.to_string(),
            }
        }
    }
}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
