// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Student account login flow

use std::ops::Deref;

use tracing::info;

use super::{establish_session, ApiClient};
use crate::error::{Error, Result};
use crate::http::{AccountKind, ApiSession, SessionConfig};
use crate::types::StudentInfo;

/// Client for a student account
///
/// Created exclusively through [`login`](Self::login); derefs to
/// [`ApiClient`] for the endpoint accessors. A failed login leaves no
/// usable client behind; retrying `login` from scratch is the supported
/// recovery.
#[derive(Debug)]
pub struct StudentClient {
    api: ApiClient,
}

impl StudentClient {
    /// Authenticate with a student code and date of birth
    pub async fn login(student_code: &str, date_of_birth: &str) -> Result<Self> {
        Self::login_with_config(student_code, date_of_birth, SessionConfig::default()).await
    }

    /// Authenticate against a non-default portal or with custom timing
    pub async fn login_with_config(
        student_code: &str,
        date_of_birth: &str,
        config: SessionConfig,
    ) -> Result<Self> {
        if student_code.trim().is_empty() {
            return Err(Error::invalid_argument("Student Code not provided"));
        }

        let session = ApiSession::new(AccountKind::Student, config)?;

        let code = student_code.to_uppercase();
        let form = [
            ("_method", "POST"),
            ("code", code.as_str()),
            ("dob", date_of_birth),
            ("remember_me", "1"),
            ("recaptcha-token", "no-token-available"),
        ];
        establish_session(&session, "/student/login", &form).await?;

        // One revalidation confirms the cookie-seeded identifier; the
        // same ping response carries the account identity.
        let envelope = session.ping().await?;
        let info: StudentInfo = envelope.data_as()?;
        session.set_selected_student_id(info.user.id);

        info!(student_id = info.user.id, "student login succeeded");
        Ok(Self {
            api: ApiClient::new(session),
        })
    }
}

impl Deref for StudentClient {
    type Target = ApiClient;

    fn deref(&self) -> &ApiClient {
        &self.api
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SESSION_COOKIE: &str =
        "student_session_credentials=%7B%22session_id%22%3A%22abc123%22%7D; Path=/; HttpOnly";

    fn config_for(server: &MockServer) -> SessionConfig {
        SessionConfig {
            base_url: server.uri(),
            ..SessionConfig::default()
        }
    }

    #[tokio::test]
    async fn test_empty_student_code_fails_before_any_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(302))
            .expect(0)
            .mount(&server)
            .await;

        let err = StudentClient::login_with_config("", "2005-01-01", config_for(&server))
            .await
            .unwrap_err();
        match err {
            Error::InvalidArgument(msg) => assert_eq!(msg, "Student Code not provided"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/student/login"))
            .and(body_string_contains("code=ABC123"))
            .and(body_string_contains("_method=POST"))
            .and(body_string_contains("remember_me=1"))
            .respond_with(
                ResponseTemplate::new(302)
                    .append_header("set-cookie", SESSION_COOKIE)
                    .append_header("set-cookie", "other=1; Path=/"),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/apiv2student/ping"))
            .and(wiremock::matchers::header("authorization", "Basic abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": 1,
                "data": {"user": {"id": 42, "name": "Jo"}},
                "meta": {"session_id": "abc123"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = StudentClient::login_with_config("abc123", "2005-01-01", config_for(&server))
            .await
            .unwrap();
        assert_eq!(client.selected_student_id(), 42);
        assert_eq!(client.session().session_id(), "abc123");
    }

    #[tokio::test]
    async fn test_comma_folded_login_cookies_are_all_replayed() {
        let server = MockServer::start().await;
        // One header carrying two comma-folded cookies
        Mock::given(method("POST"))
            .and(path("/student/login"))
            .respond_with(ResponseTemplate::new(302).append_header(
                "set-cookie",
                "student_session_credentials=%7B%22session_id%22%3A%22abc123%22%7D; Path=/, extra=1; HttpOnly",
            ))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/apiv2student/ping"))
            .and(wiremock::matchers::header(
                "cookie",
                "student_session_credentials=%7B%22session_id%22%3A%22abc123%22%7D;extra=1",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": 1,
                "data": {"user": {"id": 42, "name": "Jo"}},
                "meta": {"session_id": "abc123"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = StudentClient::login_with_config("abc123", "2005-01-01", config_for(&server))
            .await
            .unwrap();
        assert_eq!(client.selected_student_id(), 42);
    }

    #[tokio::test]
    async fn test_non_302_status_is_authentication_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/student/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("wrong code"))
            .mount(&server)
            .await;

        let err = StudentClient::login_with_config("abc", "2005-01-01", config_for(&server))
            .await
            .unwrap_err();
        match err {
            Error::AuthenticationFailed { status } => assert_eq!(status, 200),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("200"));
    }

    #[tokio::test]
    async fn test_302_without_cookies_is_authentication_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/student/login"))
            .respond_with(ResponseTemplate::new(302))
            .mount(&server)
            .await;

        let err = StudentClient::login_with_config("abc", "2005-01-01", config_for(&server))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AuthenticationFailed { status: 302 }));
    }

    #[tokio::test]
    async fn test_missing_session_cookie_is_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/student/login"))
            .respond_with(ResponseTemplate::new(302).append_header("set-cookie", "other=1; Path=/"))
            .mount(&server)
            .await;

        let err = StudentClient::login_with_config("abc", "2005-01-01", config_for(&server))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedSessionPayload(_)));
    }
}
