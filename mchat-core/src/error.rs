//! Unified error handling
//!
//! One error enum for the gateway, each variant carrying an [`ErrorContext`]
//! so a logged failure can be traced back to the operation that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, warn};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Error context providing additional information for debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for correlating logs with responses
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: HashMap<String, String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

/// Main error type for the session gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The backend could not be reached or the transfer broke off
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    /// The backend answered with a non-2xx status
    #[error("Backend returned HTTP {status}: {body}")]
    Backend {
        status: u16,
        body: String,
        context: ErrorContext,
    },

    /// The backend answered 2xx but the body was not what we expected
    #[error("Unexpected backend response: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    /// Login/signup succeeded at the HTTP level but no token was issued
    #[error("Backend response carried no token")]
    MissingToken { context: ErrorContext },

    /// The `userData` cookie does not hold a valid user record
    #[error("Malformed session cookie: {message}")]
    MalformedSession {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GatewayError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            GatewayError::Network { context, .. } => Some(context),
            GatewayError::Backend { context, .. } => Some(context),
            GatewayError::Decode { context, .. } => Some(context),
            GatewayError::MissingToken { context } => Some(context),
            GatewayError::MalformedSession { context, .. } => Some(context),
            GatewayError::Config { context, .. } => Some(context),
            GatewayError::Serialization(_) => None,
        }
    }

    /// Whether the failure came from the backend round trip
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            GatewayError::Network { .. }
                | GatewayError::Backend { .. }
                | GatewayError::Decode { .. }
                | GatewayError::MissingToken { .. }
        )
    }

    /// Check if retrying the same request could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            GatewayError::Network { .. } => true,
            GatewayError::Backend { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        let error_id = self.context().map(|c| c.error_id.as_str());
        let operation = self.context().and_then(|c| c.operation.as_deref());

        match self {
            GatewayError::Network { .. } | GatewayError::Backend { .. } => {
                warn!(
                    error_id = ?error_id,
                    operation = ?operation,
                    recoverable = self.is_recoverable(),
                    error = %self,
                    "Backend request failed"
                );
            }
            GatewayError::MalformedSession { .. } => {
                warn!(
                    error_id = ?error_id,
                    error = %self,
                    "Rejected session cookie"
                );
            }
            _ => {
                error!(
                    error_id = ?error_id,
                    operation = ?operation,
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! network_error {
    ($msg:expr, $component:expr, $operation:expr) => {
        $crate::GatewayError::Network {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component).with_operation($operation),
        }
    };
    ($msg:expr, $component:expr, $operation:expr, $source:expr) => {
        $crate::GatewayError::Network {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new($component).with_operation($operation),
        }
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::GatewayError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new("config").with_operation("validate"),
        }
    };
}
