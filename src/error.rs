// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Recoverable HTTP conditions (expired token, rate limit, server errors) never
//! surface here: the client degrades them to "no result". Only failures that
//! the refresh loop should see as a failed cycle become an `AppError`.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Invalid response payload: {0}")]
    Parse(String),

    #[error("Profile has no active employment")]
    NoActiveEmployment,
}

impl AppError {
    /// Map a transport-level `reqwest` failure onto the matching variant.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }

    /// Whether the error came from the network layer and is worth retrying
    /// on the next scheduled refresh.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::Network(_) | AppError::Timeout(_) | AppError::Auth(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, AppError::Timeout(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AppError>;
