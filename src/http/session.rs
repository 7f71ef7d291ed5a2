// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Authenticated-request executor
//!
//! Owns the session state captured at login (cookies, session identifier,
//! selected student) and stamps every outgoing request with the portal's
//! auth headers. The session identifier expires server-side after roughly
//! three minutes, so it is refreshed proactively before dispatch once the
//! configured interval (minus a safety margin) has elapsed.

use std::time::{Duration, Instant};

use parking_lot::RwLock;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use tracing::debug;

use super::{
    encode_form, headers, API_PATH_PARENT, API_PATH_STUDENT, BASE_URL, PING_INTERVAL,
    PING_SAFETY_MARGIN,
};
use crate::error::{Error, Result};
use crate::types::Envelope;

/// Which portal account kind a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// Student account, API under `/apiv2student`
    Student,
    /// Parent account, API under `/apiv2parent`
    Parent,
}

impl AccountKind {
    /// API base path suffix for this account kind
    pub fn api_path(&self) -> &'static str {
        match self {
            AccountKind::Student => API_PATH_STUDENT,
            AccountKind::Parent => API_PATH_PARENT,
        }
    }

    /// Name of the cookie carrying this account kind's session credentials
    pub fn session_cookie(&self) -> &'static str {
        match self {
            AccountKind::Student => super::STUDENT_SESSION_COOKIE,
            AccountKind::Parent => super::PARENT_SESSION_COOKIE,
        }
    }
}

/// Session configuration
///
/// Timing constants are explicit so tests can inject short intervals.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Portal base URL (login endpoints live directly under it)
    pub base_url: String,
    /// How long a session identifier is valid server-side
    pub ping_interval: Duration,
    /// Refresh this much before the identifier is predicted to expire
    pub ping_safety_margin: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            ping_interval: PING_INTERVAL,
            ping_safety_margin: PING_SAFETY_MARGIN,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Mutable session state, private to the executor
#[derive(Debug, Default)]
struct SessionState {
    /// Raw cookie strings captured at login, replayed verbatim
    cookies: Vec<String>,
    /// Opaque session identifier, sent as `Authorization: Basic <id>`
    session_id: String,
    /// When the session identifier was last refreshed
    last_ping: Option<Instant>,
    /// Student record that resource endpoints are scoped to
    student_id: u32,
}

/// Request body shapes the portal accepts
pub(crate) enum RequestBody {
    None,
    Form(String),
    Json(serde_json::Value),
}

/// Authenticated-request executor shared by student and parent clients
///
/// All mutable session fields live behind a lock; the lock is never held
/// across an await. Two concurrent calls observing a stale ping timestamp
/// may both refresh the identifier; that is redundant but harmless, the
/// last write wins.
#[derive(Debug)]
pub struct ApiSession {
    client: Client,
    config: SessionConfig,
    kind: AccountKind,
    api_base: String,
    state: RwLock<SessionState>,
}

impl ApiSession {
    /// Create an unauthenticated session for the given account kind
    pub(crate) fn new(kind: AccountKind, config: SessionConfig) -> Result<Self> {
        // Redirects stay disabled for the whole client: login success is
        // signalled by a raw 302 and API calls never redirect.
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(config.timeout)
            .build()?;

        let api_base = format!("{}{}", config.base_url, kind.api_path());

        Ok(Self {
            client,
            config,
            kind,
            api_base,
            state: RwLock::new(SessionState::default()),
        })
    }

    /// Account kind this session was created for
    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Portal base URL (login endpoints)
    pub(crate) fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Underlying HTTP client, used by the login flows
    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Currently selected student ID (0 before login)
    pub fn selected_student_id(&self) -> u32 {
        self.state.read().student_id
    }

    pub(crate) fn set_selected_student_id(&self, id: u32) {
        self.state.write().student_id = id;
    }

    /// Current session identifier (empty before login)
    pub fn session_id(&self) -> String {
        self.state.read().session_id.clone()
    }

    /// Seed cookies and the initial session identifier after a login POST.
    ///
    /// `last_ping` stays unset so the next revalidation-eligible call (or
    /// the explicit post-login ping) confirms the identifier.
    pub(crate) fn seed_login(&self, cookies: Vec<String>, session_id: String) {
        let mut state = self.state.write();
        state.cookies = cookies;
        state.session_id = session_id;
        state.last_ping = None;
    }

    /// GET an API path (relative to the account's API base)
    pub(crate) async fn get(&self, path: &str) -> Result<Envelope> {
        self.request(Method::GET, path, RequestBody::None, true).await
    }

    /// POST a URL-encoded form to an API path
    pub(crate) async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<Envelope> {
        let body = encode_form(form);
        self.request(Method::POST, path, RequestBody::Form(body), true)
            .await
    }

    /// POST a JSON body to an API path
    pub(crate) async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<Envelope> {
        self.request(Method::POST, path, RequestBody::Json(body), true)
            .await
    }

    /// Make an authenticated request against the API base.
    ///
    /// `revalidate` gates the proactive session refresh; the ping call
    /// itself passes `false` so refreshing cannot recurse.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        revalidate: bool,
    ) -> Result<Envelope> {
        let needs_ping = {
            let state = self.state.read();
            if state.session_id.is_empty() {
                return Err(Error::NotAuthenticated);
            }
            match state.last_ping {
                Some(at) => at.elapsed() + self.config.ping_safety_margin > self.config.ping_interval,
                None => false,
            }
        };

        if revalidate && needs_ping {
            Box::pin(self.ping()).await?;
        }

        self.dispatch(method, path, body).await
    }

    /// Refresh the session identifier via the portal's ping endpoint.
    ///
    /// Also serves as the identity call: the response's `data.user`
    /// describes the logged-in account. Errors propagate unchanged; an
    /// expired session surfaces as whatever the ping endpoint returns.
    pub(crate) async fn ping(&self) -> Result<Envelope> {
        debug!(kind = ?self.kind, "revalidating session identifier");
        let body = RequestBody::Form(encode_form(&[("include_data", "true")]));
        // Revalidation stays disabled here so a ping can never trigger
        // another ping.
        let envelope = self.request(Method::POST, "/ping", body, false).await?;

        let session_id = envelope
            .meta
            .get("session_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::malformed_response(envelope.meta.to_string()))?
            .to_string();

        let mut state = self.state.write();
        state.session_id = session_id;
        state.last_ping = Some(Instant::now());

        Ok(envelope)
    }

    /// Build, send and decode one request. No revalidation here.
    async fn dispatch(&self, method: Method, path: &str, body: RequestBody) -> Result<Envelope> {
        let (cookie_header, session_id) = {
            let state = self.state.read();
            (state.cookies.join(";"), state.session_id.clone())
        };

        let url = format!("{}{}", self.api_base, path);
        debug!(%method, %url, "dispatching authenticated request");

        let mut builder = self.client.request(method, &url);
        builder = match body {
            RequestBody::None => builder,
            RequestBody::Form(form) => builder
                .header(headers::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(form),
            RequestBody::Json(json) => builder
                .header(headers::CONTENT_TYPE, "application/json")
                .body(json.to_string()),
        };

        // Auth headers go last; nothing upstream can override them.
        let response = builder
            .header(headers::COOKIE, cookie_header)
            .header(headers::AUTHORIZATION, format!("Basic {}", session_id))
            .send()
            .await?;

        let text = response.text().await?;
        let envelope: Envelope =
            serde_json::from_str(&text).map_err(|_| Error::malformed_response(text.clone()))?;

        if envelope.success == 0 {
            return Err(Error::Application(
                envelope.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_for(server_uri: &str, kind: AccountKind) -> ApiSession {
        let config = SessionConfig {
            base_url: server_uri.to_string(),
            ..SessionConfig::default()
        };
        ApiSession::new(kind, config).unwrap()
    }

    #[tokio::test]
    async fn test_request_before_login_fails_without_io() {
        let server = MockServer::start().await;
        // Any request reaching the server would violate the precondition
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let session = session_for(&server.uri(), AccountKind::Student);
        let err = session.get("/behaviour/1").await.unwrap_err();
        assert!(matches!(err, Error::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_application_error_surfaces_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apiv2student/behaviour/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": 0, "error": "bad code"})),
            )
            .mount(&server)
            .await;

        let session = session_for(&server.uri(), AccountKind::Student);
        session.seed_login(vec!["a=1".to_string()], "sess".to_string());

        let err = session.get("/behaviour/1").await.unwrap_err();
        match err {
            Error::Application(msg) => assert_eq!(msg, "bad code"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let session = session_for(&server.uri(), AccountKind::Student);
        session.seed_login(vec![], "sess".to_string());

        let err = session.get("/behaviour/1").await.unwrap_err();
        match err {
            Error::MalformedResponse { body } => assert!(body.contains("maintenance")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_auth_headers_are_replayed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(wiremock::matchers::header("authorization", "Basic sess"))
            .and(wiremock::matchers::header("cookie", "a=1;b=2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": 1, "data": [], "meta": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let session = session_for(&server.uri(), AccountKind::Student);
        session.seed_login(vec!["a=1".to_string(), "b=2".to_string()], "sess".to_string());
        session.get("/behaviour/1").await.unwrap();
    }

    #[tokio::test]
    async fn test_fresh_session_does_not_ping() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apiv2student/ping"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": 1, "data": {}, "meta": {"session_id": "next"}})),
            )
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/apiv2student/behaviour/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": 1, "data": [], "meta": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = SessionConfig {
            base_url: server.uri(),
            ping_interval: Duration::from_secs(3600),
            ..SessionConfig::default()
        };
        let session = ApiSession::new(AccountKind::Student, config).unwrap();
        session.seed_login(vec![], "sess".to_string());
        // Simulate a just-refreshed identifier
        session.state.write().last_ping = Some(Instant::now());

        session.get("/behaviour/1").await.unwrap();
    }

    #[tokio::test]
    async fn test_stale_session_pings_exactly_once_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apiv2student/ping"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": 1, "data": {}, "meta": {"session_id": "next"}})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/apiv2student/behaviour/1"))
            .and(wiremock::matchers::header("authorization", "Basic next"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": 1, "data": [], "meta": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        // Zero interval: any set last_ping counts as stale
        let config = SessionConfig {
            base_url: server.uri(),
            ping_interval: Duration::from_secs(0),
            ping_safety_margin: Duration::from_secs(0),
            ..SessionConfig::default()
        };
        let session = ApiSession::new(AccountKind::Student, config).unwrap();
        session.seed_login(vec![], "stale".to_string());
        session.state.write().last_ping = Some(Instant::now() - Duration::from_secs(1));

        session.get("/behaviour/1").await.unwrap();
        assert_eq!(session.session_id(), "next");
    }

    #[tokio::test]
    async fn test_ping_updates_session_id_and_timestamp() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apiv2parent/ping"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": 1, "data": {}, "meta": {"session_id": "fresh"}})),
            )
            .mount(&server)
            .await;

        let session = session_for(&server.uri(), AccountKind::Parent);
        session.seed_login(vec![], "old".to_string());
        assert!(session.state.read().last_ping.is_none());

        session.ping().await.unwrap();
        assert_eq!(session.session_id(), "fresh");
        assert!(session.state.read().last_ping.is_some());
    }

    #[tokio::test]
    async fn test_ping_without_session_id_in_meta_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apiv2student/ping"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": 1, "data": {}, "meta": {}})),
            )
            .mount(&server)
            .await;

        let session = session_for(&server.uri(), AccountKind::Student);
        session.seed_login(vec![], "sess".to_string());

        let err = session.ping().await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }
}
