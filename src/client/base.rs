// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Endpoint accessors shared by the student and parent clients
//!
//! Each accessor builds a query string from its typed options (absent
//! options are simply not appended), delegates to the session executor
//! and unwraps the envelope's `data` payload into the endpoint's shape.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

use crate::error::{Error, Result};
use crate::http::ApiSession;
use crate::types::{
    ActivityPoint, Announcement, Attendance, AttendanceMeta, Badge, BehaviourSummary, Detention,
    GetActivityOptions, GetAttendanceOptions, GetBehaviourOptions, GetFullActivityOptions,
    GetHomeworksOptions, Homework, Lesson, PupilCode, Reward, RewardPurchase, Student, StudentInfo,
};

/// Upper bound on the activity pagination loop; the portal has returned
/// stuck cursors before, and an unbounded loop would spin forever on one
const MAX_ACTIVITY_PAGES: u32 = 50;

lazy_static! {
    static ref HTML_TAG_RE: Regex = Regex::new(r"<[^>]+>").unwrap();
}

/// Strip an HTML fragment down to plain text
fn strip_html(fragment: &str) -> String {
    HTML_TAG_RE
        .replace_all(fragment, "")
        .replace("&nbsp;", "")
        .trim()
        .to_string()
}

fn fmt_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Append only the present parameters; returns "" or "?k=v&..."
fn build_query(pairs: &[(&str, Option<String>)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (name, value) in pairs {
        if let Some(value) = value {
            serializer.append_pair(name, value);
            any = true;
        }
    }
    if any {
        format!("?{}", serializer.finish())
    } else {
        String::new()
    }
}

/// Accessors over an authenticated [`ApiSession`]
///
/// Both [`StudentClient`](crate::client::StudentClient) and
/// [`ParentClient`](crate::client::ParentClient) deref to this, so every
/// accessor is available on either account kind; the portal scopes the
/// data to the selected student.
#[derive(Debug)]
pub struct ApiClient {
    session: ApiSession,
}

impl ApiClient {
    pub(crate) fn new(session: ApiSession) -> Self {
        Self { session }
    }

    /// The underlying session executor
    pub fn session(&self) -> &ApiSession {
        &self.session
    }

    /// ID of the student record endpoint calls are scoped to
    pub fn selected_student_id(&self) -> u32 {
        self.session.selected_student_id()
    }

    /// General information about the current student
    pub async fn get_student_info(&self) -> Result<Student> {
        let envelope = self
            .session
            .post_form("/ping", &[("include_data", "true")])
            .await?;
        let info: StudentInfo = envelope.data_as()?;
        Ok(info.user)
    }

    /// One page of the student's activity feed.
    ///
    /// This exists for pagination; [`get_full_activity`](Self::get_full_activity)
    /// is usually what callers want.
    pub async fn get_activity(&self, options: GetActivityOptions) -> Result<Vec<ActivityPoint>> {
        let query = build_query(&[
            ("from", options.from.as_ref().map(fmt_date)),
            ("to", options.to.as_ref().map(fmt_date)),
            ("last_id", options.last_id.map(|id| id.to_string())),
        ]);
        let envelope = self
            .session
            .get(&format!("/activity/{}{}", self.selected_student_id(), query))
            .await?;
        envelope.data_as()
    }

    /// The student's full activity feed between two dates.
    ///
    /// Pages through [`get_activity`](Self::get_activity), advancing the
    /// cursor to the last item's ID until a page comes back empty. Gives
    /// up with [`Error::TooManyPages`] after 50 pages rather than looping
    /// forever on a stuck cursor.
    pub async fn get_full_activity(
        &self,
        options: GetFullActivityOptions,
    ) -> Result<Vec<ActivityPoint>> {
        let mut all = Vec::new();
        let mut last_id = None;

        for _ in 0..MAX_ACTIVITY_PAGES {
            let page = self
                .get_activity(GetActivityOptions {
                    from: options.from,
                    to: options.to,
                    last_id,
                })
                .await?;
            match page.last() {
                None => return Ok(all),
                Some(last) => {
                    last_id = Some(last.id);
                    all.extend(page);
                }
            }
        }

        Err(Error::TooManyPages {
            pages: MAX_ACTIVITY_PAGES,
        })
    }

    /// The student's behaviour summary (timeline and reason breakdowns)
    pub async fn get_behaviour(&self, options: GetBehaviourOptions) -> Result<BehaviourSummary> {
        let query = build_query(&[
            ("from", options.from.as_ref().map(fmt_date)),
            ("to", options.to.as_ref().map(fmt_date)),
        ]);
        let envelope = self
            .session
            .get(&format!("/behaviour/{}{}", self.selected_student_id(), query))
            .await?;
        envelope.data_as()
    }

    /// The student's homeworks.
    ///
    /// Descriptions arrive as HTML fragments; the raw fragment is kept in
    /// `description_raw` and `description` is reduced to plain text.
    pub async fn get_homeworks(&self, options: GetHomeworksOptions) -> Result<Vec<Homework>> {
        let query = build_query(&[
            (
                "display_date",
                options.display_date.map(|d| d.as_str().to_string()),
            ),
            ("from", options.from.as_ref().map(fmt_date)),
            ("to", options.to.as_ref().map(fmt_date)),
        ]);
        let envelope = self
            .session
            .get(&format!("/homeworks/{}{}", self.selected_student_id(), query))
            .await?;
        let mut homeworks: Vec<Homework> = envelope.data_as()?;

        for homework in &mut homeworks {
            homework.description_raw = homework.description.clone();
            homework.description = strip_html(&homework.description);
        }

        Ok(homeworks)
    }

    /// The student's timetable for one day
    pub async fn get_lessons(&self, date: NaiveDate) -> Result<Vec<Lesson>> {
        let query = build_query(&[("date", Some(fmt_date(&date)))]);
        let envelope = self
            .session
            .get(&format!("/timetable/{}{}", self.selected_student_id(), query))
            .await?;
        envelope.data_as()
    }

    /// The student's earned event badges
    pub async fn get_badges(&self) -> Result<Vec<Badge>> {
        let envelope = self
            .session
            .get(&format!("/eventbadges/{}", self.selected_student_id()))
            .await?;
        envelope.data_as()
    }

    /// The school's announcements for the student
    pub async fn get_announcements(&self) -> Result<Vec<Announcement>> {
        let envelope = self
            .session
            .get(&format!("/announcements/{}", self.selected_student_id()))
            .await?;
        envelope.data_as()
    }

    /// The student's detentions
    pub async fn get_detentions(&self) -> Result<Vec<Detention>> {
        let envelope = self
            .session
            .get(&format!("/detentions/{}", self.selected_student_id()))
            .await?;
        envelope.data_as()
    }

    /// The student's attendance records plus the date-range metadata
    pub async fn get_attendance(
        &self,
        options: GetAttendanceOptions,
    ) -> Result<(Attendance, AttendanceMeta)> {
        let query = build_query(&[
            ("from", options.from.as_ref().map(fmt_date)),
            ("to", options.to.as_ref().map(fmt_date)),
        ]);
        let envelope = self
            .session
            .get(&format!("/attendance/{}{}", self.selected_student_id(), query))
            .await?;
        let meta = envelope.meta_as()?;
        Ok((envelope.data, meta))
    }

    /// Items in the school's reward shop
    pub async fn get_rewards(&self) -> Result<Vec<Reward>> {
        let envelope = self
            .session
            .get(&format!("/rewards/{}", self.selected_student_id()))
            .await?;
        envelope.data_as()
    }

    /// Purchase a reward item for the selected student
    pub async fn purchase_reward(&self, item_id: u64) -> Result<RewardPurchase> {
        let pupil_id = self.selected_student_id().to_string();
        let envelope = self
            .session
            .post_form(
                &format!("/purchase/{}", item_id),
                &[("pupil_id", pupil_id.as_str())],
            )
            .await?;
        envelope.data_as()
    }

    /// The student's check-in code for a given day
    pub async fn get_pupil_code(&self, date: NaiveDate) -> Result<PupilCode> {
        let envelope = self
            .session
            .post_json("/getcode", json!({ "date": fmt_date(&date) }))
            .await?;
        envelope.data_as()
    }
}
