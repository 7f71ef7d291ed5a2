// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for the ClassCharts client
//!
//! Provides Set-Cookie parsing, session-credential extraction and the
//! authenticated-request executor shared by the student and parent
//! clients.

pub mod cookie;
mod session;

pub use session::{AccountKind, ApiSession, SessionConfig};

use std::time::Duration;

/// Portal base URL; login endpoints live directly under it
pub const BASE_URL: &str = "https://www.classcharts.com";

/// Path suffix of the student API base
pub const API_PATH_STUDENT: &str = "/apiv2student";

/// Path suffix of the parent API base
pub const API_PATH_PARENT: &str = "/apiv2parent";

/// Observed lifetime of a portal session identifier
pub const PING_INTERVAL: Duration = Duration::from_secs(180);

/// Margin subtracted from the session lifetime so the identifier cannot
/// expire while a request is in flight
pub const PING_SAFETY_MARGIN: Duration = Duration::from_secs(5);

/// Name of the cookie carrying the student session credentials
pub const STUDENT_SESSION_COOKIE: &str = "student_session_credentials";

/// Name of the cookie carrying the parent session credentials
pub const PARENT_SESSION_COOKIE: &str = "parent_session_credentials";

/// Common HTTP headers
pub mod headers {
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const AUTHORIZATION: &str = "authorization";
}

/// URL-encode a form body
pub(crate) fn encode_form(pairs: &[(&str, &str)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (name, value) in pairs {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}
