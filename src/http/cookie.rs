// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Set-Cookie parsing and session-credential extraction
//!
//! The portal surfaces all login cookies as a single comma-joined
//! `Set-Cookie` header value. One of those cookies carries a
//! percent-encoded JSON payload with the session identifier in it.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Parse a raw `Set-Cookie` header value into a name -> value map.
///
/// Attributes after the first `;` of each entry (`Expires`, `Max-Age`,
/// `Path`, ...) are discarded. Names are percent-decoded and left-trimmed
/// (the portal emits a space after each comma separator); values are
/// percent-decoded. An entry without `=` maps its name to the empty
/// string. Duplicate names collapse, last occurrence wins.
///
/// This never fails: malformed input degrades to a partial or empty map.
pub fn parse_cookies(raw: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();

    for entry in raw.split(',') {
        let pair = entry.split(';').next().unwrap_or(entry);
        if pair.trim().is_empty() {
            continue;
        }

        let (name, value) = match pair.split_once('=') {
            Some((name, value)) => (name, value),
            None => (pair, ""),
        };

        let name = percent_decode_str(name).decode_utf8_lossy();
        let value = percent_decode_str(value).decode_utf8_lossy();
        cookies.insert(name.trim_start().to_string(), value.into_owned());
    }

    cookies
}

/// Shape of the JSON payload inside a session-credentials cookie
#[derive(Debug, Deserialize)]
struct SessionCredentials {
    session_id: String,
}

/// Extract the session identifier embedded in the named cookie.
///
/// The cookie value must be a JSON object with a `session_id` field
/// (percent-decoding already happened in [`parse_cookies`]). A missing
/// cookie or an unparsable payload is an authentication failure, not
/// something to retry.
pub fn extract_session_id(cookies: &HashMap<String, String>, name: &str) -> Result<String> {
    let payload = cookies
        .get(name)
        .ok_or_else(|| Error::session_payload(format!("cookie `{}` not present", name)))?;

    let credentials: SessionCredentials = serde_json::from_str(payload).map_err(|e| {
        Error::session_payload(format!("cookie `{}` is not valid JSON: {}", name, e))
    })?;

    Ok(credentials.session_id)
}
