// FunimationLater - Rust client for the Funimation streaming API
// Copyright (C) 2025 FunimationLater contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Error types for FunimationLater
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors fall into four groups:
//!
//! - **Transport**: the origin answered with a non-2xx status (`DetailedHttpError`)
//!   or the request never got a status at all (`Network`)
//! - **Parse**: the body could not be read as the expected format, or carried an
//!   error payload inside a 200 response (`UnknownResponse`)
//! - **Usage**: an argument was rejected before any network activity
//!   (`InvalidHeader`)
//! - **Session/catalog**: raised by the façade after inspecting a parsed
//!   response (`AuthenticationFailed`, `LoginRequired`, `InvalidSeason`,
//!   `UnknownEpisode`)

use reqwest::header::HeaderMap;
use thiserror::Error;

/// Result type alias using our FunimationError type
pub type Result<T> = std::result::Result<T, FunimationError>;

/// Main error type for FunimationLater
#[derive(Error, Debug)]
pub enum FunimationError {
    // ===== Transport Errors =====

    /// The origin server answered with a non-2xx status
    #[error("HTTP {status} {message} for {url}")]
    DetailedHttpError {
        /// Fully built URL that was requested
        url: String,
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase for the status
        message: String,
        /// Response headers as received
        headers: HeaderMap,
        /// Readable response body (may be empty)
        body: String,
    },

    /// Network connectivity error with no HTTP status (DNS, connect, TLS, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    // ===== Parse Errors =====

    /// Response body could not be interpreted, or it carried an error payload
    #[error("Unknown response: {message}")]
    UnknownResponse {
        message: String,
        /// Response body for debugging
        body: Option<String>,
    },

    // ===== Usage Errors =====

    /// Header name or value rejected by `add_headers`
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        name: String,
        reason: String,
    },

    // ===== Session / Catalog Errors =====

    /// Credentials were rejected or the login response had no usable token
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A catalog call was made before a successful login
    #[error("Login required")]
    LoginRequired,

    /// Requested season does not exist for the show
    #[error("Invalid season {season} for show {show_id}")]
    InvalidSeason {
        show_id: String,
        season: u32,
    },

    /// Requested episode does not exist in the season
    #[error("Unknown episode {episode} in season {season}")]
    UnknownEpisode {
        season: u32,
        episode: u32,
    },
}

// Helper methods for creating common errors
impl FunimationError {
    /// Create an UnknownResponse error without a body
    pub fn unknown_response<S: Into<String>>(message: S) -> Self {
        FunimationError::UnknownResponse {
            message: message.into(),
            body: None,
        }
    }

    /// Create an UnknownResponse error keeping the offending body
    pub fn unknown_response_with_body<S: Into<String>>(message: S, body: &[u8]) -> Self {
        FunimationError::UnknownResponse {
            message: message.into(),
            body: Some(String::from_utf8_lossy(body).into_owned()),
        }
    }

    /// Create an AuthenticationFailed error
    pub fn auth_failed<S: Into<String>>(message: S) -> Self {
        FunimationError::AuthenticationFailed(message.into())
    }

    /// HTTP status code, when the origin answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FunimationError::DetailedHttpError { status, .. } => Some(*status),
            FunimationError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if error came from the transport layer
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            FunimationError::DetailedHttpError { .. } | FunimationError::Network(_)
        )
    }

    /// Check if error means the caller has to (re-)authenticate
    ///
    /// A 401 from the origin counts: the stored token was rejected.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            FunimationError::AuthenticationFailed(_)
                | FunimationError::LoginRequired
                | FunimationError::DetailedHttpError { status: 401, .. }
        )
    }

    /// Get user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            FunimationError::AuthenticationFailed(_) => {
                "Username or password is incorrect.".to_string()
            }
            FunimationError::LoginRequired => {
                "You need to log in before browsing the catalog.".to_string()
            }
            FunimationError::DetailedHttpError { status, message, .. } => {
                format!("The server answered {} {}. Please try again later.", status, message)
            }
            FunimationError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            _ => self.to_string(),
        }
    }
}
