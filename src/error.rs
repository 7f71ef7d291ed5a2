// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the ClassCharts client
//!
//! Every failure surfaces as a distinct variant; nothing is retried
//! internally. Application-level errors (the portal answering
//! `success: 0`) are kept separate from transport and decoding errors.

use thiserror::Error;

/// Result type alias for ClassCharts operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the ClassCharts client
#[derive(Error, Debug)]
pub enum Error {
    /// A required caller input was missing or empty, checked before any I/O
    #[error("{0}")]
    InvalidArgument(String),

    /// An authenticated call was attempted before a successful login
    #[error("Not authenticated: no session ID, call login() first")]
    NotAuthenticated,

    /// The login endpoint did not return the expected redirect + cookie signal
    #[error("Authentication failed: ClassCharts returned status {status}")]
    AuthenticationFailed { status: u16 },

    /// The session-credentials cookie was missing or its payload unparsable
    #[error("Malformed session payload: {0}")]
    MalformedSessionPayload(String),

    /// The response body was not the expected JSON envelope
    #[error("Malformed response body: {body}")]
    MalformedResponse { body: String },

    /// The portal answered with `success: 0` and an error message
    #[error("{0}")]
    Application(String),

    /// The parent account has no pupils attached
    #[error("Account has no pupils attached")]
    NoPupilsAttached,

    /// No pupil in the cached roster has the requested ID
    #[error("No pupil with ID {0} attached to this account")]
    PupilNotFound(u32),

    /// The activity pagination loop exceeded its page cap
    #[error("Activity pagination exceeded {pages} pages, aborting")]
    TooManyPages { pages: u32 },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a new invalid-argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create a new malformed-session-payload error
    pub fn session_payload<S: Into<String>>(msg: S) -> Self {
        Error::MalformedSessionPayload(msg.into())
    }

    /// Create a new malformed-response error carrying the raw body
    pub fn malformed_response<S: Into<String>>(body: S) -> Self {
        Error::MalformedResponse { body: body.into() }
    }
}
