// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response envelope, endpoint response shapes and accessor options
//!
//! Every portal endpoint answers with the same envelope:
//! `{success: 0|1, data, meta, error?}`. The per-endpoint shapes below
//! are deliberately lenient (`serde(default)` on fields schools can
//! disable) since the portal omits fields depending on school settings.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{Error, Result};

/// The uniform JSON wrapper every endpoint returns
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// 1 on success, 0 on an application-level failure
    pub success: u8,
    /// Resource-specific payload
    #[serde(default)]
    pub data: serde_json::Value,
    /// Resource-specific metadata (the ping endpoint carries the
    /// refreshed session identifier here)
    #[serde(default)]
    pub meta: serde_json::Value,
    /// Error message, set when `success` is 0
    #[serde(default)]
    pub error: Option<String>,
}

impl Envelope {
    /// Deserialize the `data` payload into a typed shape
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.data.clone())
            .map_err(|_| Error::malformed_response(self.data.to_string()))
    }

    /// Deserialize the `meta` payload into a typed shape
    pub fn meta_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.meta.clone())
            .map_err(|_| Error::malformed_response(self.meta.to_string()))
    }
}

/// The logged-in student (or the selected pupil's account view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub display_behaviour: bool,
    #[serde(default)]
    pub display_homework: bool,
    #[serde(default)]
    pub display_rewards: bool,
    #[serde(default)]
    pub display_detentions: bool,
    #[serde(default)]
    pub display_announcements: bool,
    #[serde(default)]
    pub display_attendance: bool,
    #[serde(default)]
    pub display_timetable: bool,
    #[serde(default)]
    pub display_event_badges: bool,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub announcements_count: u32,
    #[serde(default)]
    pub has_birthday: bool,
}

/// `data` payload of the ping / identity endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct StudentInfo {
    pub user: Student,
}

/// One activity item; `id` doubles as the pagination cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub id: u64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub polarity: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub pupil_name: String,
    #[serde(default)]
    pub lesson_name: String,
    #[serde(default)]
    pub teacher_name: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub detention_date: Option<String>,
    #[serde(default)]
    pub detention_time: Option<String>,
    #[serde(default)]
    pub detention_location: Option<String>,
    #[serde(default)]
    pub detention_type: Option<String>,
}

/// One point of the behaviour timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviourTimelinePoint {
    #[serde(default)]
    pub positive: i32,
    #[serde(default)]
    pub negative: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

/// Aggregated behaviour summary for a date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviourSummary {
    #[serde(default)]
    pub timeline: Vec<BehaviourTimelinePoint>,
    #[serde(default)]
    pub positive_reasons: HashMap<String, i64>,
    #[serde(default)]
    pub negative_reasons: HashMap<String, i64>,
    #[serde(default)]
    pub other_positive: Vec<serde_json::Value>,
    #[serde(default)]
    pub other_negative: Vec<serde_json::Value>,
}

/// Completion state attached to a homework
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeworkStatus {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub ticked: String,
    #[serde(default)]
    pub allow_attachments: String,
    #[serde(default)]
    pub first_seen_date: Option<String>,
    #[serde(default)]
    pub last_seen_date: Option<String>,
    #[serde(default)]
    pub has_feedback: bool,
    #[serde(default)]
    pub attachments: Vec<serde_json::Value>,
}

/// A single homework entry
///
/// `description` arrives as an HTML fragment; the accessor strips it to
/// plain text and preserves the original in `description_raw`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Homework {
    pub id: u64,
    #[serde(default)]
    pub lesson: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub homework_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_raw: String,
    #[serde(default)]
    pub issue_date: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub completion_time_unit: String,
    #[serde(default)]
    pub completion_time_value: String,
    #[serde(default)]
    pub publish_time: String,
    #[serde(default)]
    pub status: Option<HomeworkStatus>,
    #[serde(default)]
    pub validated_links: Vec<serde_json::Value>,
    #[serde(default)]
    pub validated_attachments: Vec<serde_json::Value>,
}

/// A timetable entry for one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(default)]
    pub teacher_name: String,
    #[serde(default)]
    pub lesson_name: String,
    #[serde(default)]
    pub subject_name: String,
    #[serde(default)]
    pub is_alternative_lesson: bool,
    #[serde(default)]
    pub period_name: String,
    #[serde(default)]
    pub period_number: String,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub key: u64,
    #[serde(default)]
    pub note: String,
}

/// An earned event badge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub colour: String,
    #[serde(default)]
    pub created_date: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub pupil_badges: Vec<serde_json::Value>,
}

/// A school announcement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub school_name: String,
    #[serde(default)]
    pub teacher_name: String,
    #[serde(default)]
    pub formatted_date: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub sticky: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// A scheduled or past detention
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detention {
    pub id: u64,
    #[serde(default)]
    pub attended: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub pupil: serde_json::Value,
    #[serde(default)]
    pub lesson: serde_json::Value,
    #[serde(default)]
    pub teacher: serde_json::Value,
    #[serde(default)]
    pub detention_type: serde_json::Value,
}

/// Attendance payload; the inner shape (per-date session marks) is
/// school-configurable, so it stays dynamic
pub type Attendance = serde_json::Value;

/// Metadata returned alongside attendance data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceMeta {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub percentage: Option<String>,
    #[serde(default)]
    pub percentage_since_august: Option<String>,
}

/// An item in the school's reward shop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub stock_control: bool,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub purchased: bool,
    #[serde(default)]
    pub purchased_count: i64,
    #[serde(default)]
    pub can_purchase: bool,
    #[serde(default)]
    pub once_per_pupil: bool,
}

/// Result of purchasing a reward item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardPurchase {
    #[serde(default)]
    pub single_purchase: bool,
    #[serde(default)]
    pub order_id: Option<u64>,
    #[serde(default)]
    pub balance: i64,
}

/// Daily pupil check-in code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PupilCode {
    #[serde(default)]
    pub code: String,
}

/// A pupil attached to a parent account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pupil {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub school_name: String,
}

/// Options for [`get_activity`](crate::client::ApiClient::get_activity)
#[derive(Debug, Clone, Default)]
pub struct GetActivityOptions {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Pagination cursor: ID of the last item of the previous page
    pub last_id: Option<u64>,
}

/// Options for [`get_full_activity`](crate::client::ApiClient::get_full_activity)
#[derive(Debug, Clone, Default)]
pub struct GetFullActivityOptions {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Options for [`get_behaviour`](crate::client::ApiClient::get_behaviour)
#[derive(Debug, Clone, Default)]
pub struct GetBehaviourOptions {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Which date field homework filtering applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayDate {
    DueDate,
    IssueDate,
}

impl DisplayDate {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            DisplayDate::DueDate => "due_date",
            DisplayDate::IssueDate => "issue_date",
        }
    }
}

/// Options for [`get_homeworks`](crate::client::ApiClient::get_homeworks)
#[derive(Debug, Clone, Default)]
pub struct GetHomeworksOptions {
    pub display_date: Option<DisplayDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Options for [`get_attendance`](crate::client::ApiClient::get_attendance)
#[derive(Debug, Clone, Default)]
pub struct GetAttendanceOptions {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
