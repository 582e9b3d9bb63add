//! Error types and handling infrastructure for eeprobe.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types and `anyhow` for application-level error handling with context.
//!
//! ## Design Principles
//!
//! - **User-friendly messages**: Errors surface in the placeholder's error panel,
//!   so every message must read well on its own
//! - **Context preservation**: Fetch errors keep their transport cause for the
//!   rendered cause chain
//! - **Extensibility**: Easy to add new error variants as renderers grow
//! - **Consistency**: Standardized Result type across all modules
//!
//! A failed job is indistinguishable to the UI whether the remote fetch or a
//! renderer failed; both funnel into the same error panel.

use thiserror::Error;

/// The main error type for eeprobe operations.
///
/// This enum covers all possible error conditions that can occur while
/// resolving remote object types and rendering their descriptions.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Remote description fetch failed (transport, serialization, server-side)
    #[error("Remote fetch failed: {message}")]
    Fetch {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    /// Caller lacks access to the remote object (common case for user feedback)
    #[error("Permission denied: {object}")]
    PermissionDenied { object: String },

    /// The remote object does not exist
    #[error("Remote object not found: {object}")]
    NotFound { object: String },

    /// A fetched description did not have the shape its renderer expects
    #[error("Malformed description: {message}")]
    Description { message: String },

    /// A renderer failed while building the output tree
    #[error("Render failed: {message}")]
    Render { message: String },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for eeprobe operations.
///
/// This type alias provides a consistent error handling interface across
/// all modules in the eeprobe codebase.
pub type Result<T> = std::result::Result<T, ProbeError>;

impl ProbeError {
    /// Create a Fetch error with a descriptive message and no underlying cause
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Fetch error that preserves its transport-level cause
    pub fn fetch_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Fetch {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a PermissionDenied error naming the inaccessible object
    pub fn permission_denied(object: impl Into<String>) -> Self {
        Self::PermissionDenied {
            object: object.into(),
        }
    }

    /// Create a NotFound error naming the missing object
    pub fn not_found(object: impl Into<String>) -> Self {
        Self::NotFound {
            object: object.into(),
        }
    }

    /// Create a Description error with a descriptive message
    pub fn description(message: impl Into<String>) -> Self {
        Self::Description {
            message: message.into(),
        }
    }

    /// Create a Render error with a descriptive message
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

// Automatic conversion from serde_json::Error for sources that parse raw payloads
impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Fetch {
            message: "Description payload is not valid JSON".to_string(),
            source: Some(Box::new(err)),
        }
    }
}
