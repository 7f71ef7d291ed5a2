// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # classcharts - ClassCharts API client
//!
//! Async Rust client for the ClassCharts school management portal,
//! covering both account kinds the portal offers.
//!
//! Login is a form POST that answers with a redirect and a batch of
//! session cookies; one cookie embeds a JSON payload carrying the actual
//! session identifier. The client replays those cookies and the
//! identifier (as `Authorization: Basic <id>`, the portal's convention)
//! on every call, and refreshes the identifier proactively before the
//! portal's three-minute session lifetime runs out.
//!
//! ## Features
//!
//! - Student and parent accounts, one shared accessor surface
//! - Typed accessors: activity, behaviour, homeworks, timetable, badges,
//!   announcements, detentions, attendance, rewards
//! - Transparent session revalidation with injectable timing
//! - Pupil roster handling and selection for parent accounts
//! - No persisted state: a session lives and dies with its client
//!
//! ## Example
//!
//! ```rust,no_run
//! use classcharts::{GetBehaviourOptions, StudentClient};
//!
//! #[tokio::main]
//! async fn main() -> classcharts::Result<()> {
//!     let client = StudentClient::login("ABC123", "2005-01-01").await?;
//!
//!     let behaviour = client.get_behaviour(GetBehaviourOptions::default()).await?;
//!     for point in behaviour.timeline {
//!         println!("{}: +{} -{}", point.name, point.positive, point.negative);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod types;

// Re-exports for convenience

// Clients
pub use client::{ApiClient, ParentClient, StudentClient};

// Session executor and configuration
pub use http::{AccountKind, ApiSession, SessionConfig};

// Errors
pub use error::{Error, Result};

// Response shapes
pub use types::{
    ActivityPoint, Announcement, Attendance, AttendanceMeta, Badge, BehaviourSummary,
    BehaviourTimelinePoint, Detention, Envelope, Homework, HomeworkStatus, Lesson, Pupil,
    PupilCode, Reward, RewardPurchase, Student, StudentInfo,
};

// Accessor options
pub use types::{
    DisplayDate, GetActivityOptions, GetAttendanceOptions, GetBehaviourOptions,
    GetFullActivityOptions, GetHomeworksOptions,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
