// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Parent account login flow and pupil selection

use std::ops::Deref;

use tracing::info;

use super::{establish_session, ApiClient};
use crate::error::{Error, Result};
use crate::http::{AccountKind, ApiSession, SessionConfig};
use crate::types::Pupil;

/// Client for a parent account
///
/// A parent account fronts one or more pupils; endpoint accessors are
/// scoped to the selected pupil, which defaults to the first in the
/// roster fetched at login. Derefs to [`ApiClient`] for the accessors.
#[derive(Debug)]
pub struct ParentClient {
    api: ApiClient,
    pupils: Vec<Pupil>,
}

impl ParentClient {
    /// Authenticate with a parent email address and password
    pub async fn login(email: &str, password: &str) -> Result<Self> {
        Self::login_with_config(email, password, SessionConfig::default()).await
    }

    /// Authenticate against a non-default portal or with custom timing
    pub async fn login_with_config(
        email: &str,
        password: &str,
        config: SessionConfig,
    ) -> Result<Self> {
        if email.trim().is_empty() {
            return Err(Error::invalid_argument("Email not provided"));
        }
        if password.is_empty() {
            return Err(Error::invalid_argument("Password not provided"));
        }

        let session = ApiSession::new(AccountKind::Parent, config)?;

        let form = [
            ("_method", "POST"),
            ("email", email),
            ("logintype", "existing"),
            ("password", password),
            ("remember_me", "1"),
            ("recaptcha-token", "no-token-available"),
        ];
        establish_session(&session, "/parent/login", &form).await?;

        // Confirm the cookie-seeded identifier before the roster fetch.
        session.ping().await?;

        let api = ApiClient::new(session);
        let pupils: Vec<Pupil> = api.session().get("/pupils").await?.data_as()?;
        let first = pupils.first().ok_or(Error::NoPupilsAttached)?;
        api.session().set_selected_student_id(first.id);

        info!(
            pupil_count = pupils.len(),
            selected = first.id,
            "parent login succeeded"
        );
        Ok(Self { api, pupils })
    }

    /// The pupil roster cached at login
    pub fn pupils(&self) -> &[Pupil] {
        &self.pupils
    }

    /// Re-fetch the pupil roster from the portal
    pub async fn get_pupils(&self) -> Result<Vec<Pupil>> {
        self.api.session().get("/pupils").await?.data_as()
    }

    /// Scope subsequent endpoint calls to the pupil with this ID.
    ///
    /// The ID must come from the cached roster; an unknown ID fails with
    /// [`Error::PupilNotFound`] and leaves the selection unchanged.
    pub fn select_pupil(&self, pupil_id: u32) -> Result<()> {
        if pupil_id == 0 {
            return Err(Error::invalid_argument("No pupil ID specified"));
        }
        for pupil in &self.pupils {
            if pupil.id == pupil_id {
                self.api.session().set_selected_student_id(pupil_id);
                return Ok(());
            }
        }
        Err(Error::PupilNotFound(pupil_id))
    }
}

impl Deref for ParentClient {
    type Target = ApiClient;

    fn deref(&self) -> &ApiClient {
        &self.api
    }
}
