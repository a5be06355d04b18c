/// Error types for holderscan
/// Wraps API and configuration failures under a single HolderScanError
use std::fmt;

// =============================================================================
// MAIN ERROR TYPE
// =============================================================================

#[derive(Debug, Clone)]
pub enum HolderScanError {
    // Third-party HTTP API failures (Solscan, DexScreener)
    Api(ApiError),

    // Configuration errors
    Configuration(ConfigurationError),

    // Local persistence (SQLite, JSON files)
    Storage(StorageError),
}

impl fmt::Display for HolderScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HolderScanError::Api(e) => write!(f, "API Error: {}", e),
            HolderScanError::Configuration(e) => write!(f, "Configuration Error: {}", e),
            HolderScanError::Storage(e) => write!(f, "Storage Error: {}", e),
        }
    }
}

impl std::error::Error for HolderScanError {}

impl From<ApiError> for HolderScanError {
    fn from(e: ApiError) -> Self {
        HolderScanError::Api(e)
    }
}

impl From<ConfigurationError> for HolderScanError {
    fn from(e: ConfigurationError) -> Self {
        HolderScanError::Configuration(e)
    }
}

impl From<StorageError> for HolderScanError {
    fn from(e: StorageError) -> Self {
        HolderScanError::Storage(e)
    }
}

// =============================================================================
// API ERROR TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// HTTP 429 from the remote side
    RateLimited { endpoint: String },
    /// Any other non-success status
    HttpStatus {
        endpoint: String,
        status: u16,
        body: Option<String>,
    },
    /// Body did not decode into the expected shape
    Malformed { endpoint: String, error: String },
    /// Transport failure (DNS, TLS, timeout, connection reset)
    Request { endpoint: String, error: String },
}

impl ApiError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }

    /// Build the matching variant from a response status code
    pub fn from_status(endpoint: &str, status: u16, body: Option<String>) -> Self {
        if status == 429 {
            ApiError::RateLimited {
                endpoint: endpoint.to_string(),
            }
        } else {
            ApiError::HttpStatus {
                endpoint: endpoint.to_string(),
                status,
                body,
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RateLimited { endpoint } => write!(f, "Rate limited by {}", endpoint),
            ApiError::HttpStatus {
                endpoint,
                status,
                body,
            } => write!(
                f,
                "HTTP {} from {}: {}",
                status,
                endpoint,
                body.as_deref().unwrap_or("No body")
            ),
            ApiError::Malformed { endpoint, error } => {
                write!(f, "Malformed response from {}: {}", endpoint, error)
            }
            ApiError::Request { endpoint, error } => {
                write!(f, "Request to {} failed: {}", endpoint, error)
            }
        }
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// CONFIGURATION ERROR TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    InvalidConfig { field: String, reason: String },
    MissingConfig { field: String },
    FileRead { path: String, error: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::InvalidConfig { field, reason } => {
                write!(f, "Invalid config field '{}': {}", field, reason)
            }
            ConfigurationError::MissingConfig { field } => {
                write!(f, "Missing required config '{}'", field)
            }
            ConfigurationError::FileRead { path, error } => {
                write!(f, "Failed to read config file {}: {}", path, error)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

// =============================================================================
// STORAGE ERROR TYPES
// =============================================================================

#[derive(Debug, Clone)]
pub enum StorageError {
    Database { operation: String, error: String },
    File { path: String, error: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Database { operation, error } => {
                write!(f, "Database {} failed: {}", operation, error)
            }
            StorageError::File { path, error } => write!(f, "File {} error: {}", path, error),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database {
            operation: "query".to_string(),
            error: e.to_string(),
        }
    }
}

// =============================================================================
// HELPER CONSTRUCTORS
// =============================================================================

impl HolderScanError {
    /// Create a missing configuration error
    pub fn missing_config(field: impl Into<String>) -> Self {
        HolderScanError::Configuration(ConfigurationError::MissingConfig {
            field: field.into(),
        })
    }

    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        HolderScanError::Configuration(ConfigurationError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        })
    }

    /// Create a database error for the named operation
    pub fn database(operation: impl Into<String>, error: impl fmt::Display) -> Self {
        HolderScanError::Storage(StorageError::Database {
            operation: operation.into(),
            error: error.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_429_maps_to_rate_limited() {
        let err = ApiError::from_status("account/transactions", 429, None);
        assert!(err.is_rate_limited());

        let err = ApiError::from_status("account/transactions", 504, Some("gateway".into()));
        assert!(!err.is_rate_limited());
        assert_eq!(
            err.to_string(),
            "HTTP 504 from account/transactions: gateway"
        );
    }

    #[test]
    fn test_wrapped_display() {
        let err: HolderScanError = ConfigurationError::MissingConfig {
            field: "BOT_TOKEN".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Configuration Error: Missing required config 'BOT_TOKEN'"
        );
    }
}
