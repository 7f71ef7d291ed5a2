// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Student and parent clients
//!
//! Both account kinds share one login shape: a form POST that answers
//! with a 302 and a batch of cookies, one of which embeds the session
//! identifier. The flows differ only in endpoint path, form fields and
//! which cookie carries the credentials, so the common part lives here
//! and each client adds its own identity bootstrap on top.

mod base;
mod parent;
mod student;

pub use base::ApiClient;
pub use parent::ParentClient;
pub use student::StudentClient;

use tracing::debug;

use crate::error::{Error, Result};
use crate::http::cookie::{extract_session_id, parse_cookies};
use crate::http::{encode_form, headers, ApiSession};

/// POST the login form and seed the session from the response cookies.
///
/// Success is exactly a 302 with at least one `Set-Cookie` header; any
/// other response fails with the observed status. The response body is
/// drained before the failure surfaces so the connection is released.
async fn establish_session(
    session: &ApiSession,
    login_path: &str,
    form: &[(&str, &str)],
) -> Result<()> {
    let url = format!("{}{}", session.base_url(), login_path);
    debug!(%url, "posting login form");

    let response = session
        .http()
        .post(&url)
        .header(headers::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(encode_form(form))
        .send()
        .await?;

    let status = response.status().as_u16();
    let raw_cookies: Vec<String> = response
        .headers()
        .get_all(headers::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect();

    if status != 302 || raw_cookies.is_empty() {
        let _ = response.text().await;
        return Err(Error::AuthenticationFailed { status });
    }

    let parsed = parse_cookies(&raw_cookies.join(", "));
    let session_id = extract_session_id(&parsed, session.kind().session_cookie())?;

    // Replay only the name=value part of each cookie; the attributes are
    // meaningless in a Cookie request header. A single header can carry
    // several comma-folded cookies, so split those apart the same way
    // parse_cookies does.
    let replay: Vec<String> = raw_cookies
        .iter()
        .flat_map(|header| header.split(','))
        .filter_map(|entry| {
            let pair = entry.split(';').next().unwrap_or(entry).trim();
            (!pair.is_empty()).then(|| pair.to_string())
        })
        .collect();

    session.seed_login(replay, session_id);
    Ok(())
}
