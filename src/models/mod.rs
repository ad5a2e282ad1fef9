//! Domain models for the TMC submit client.
//!
//! # Core Concepts
//!
//! ## Persisted
//!
//! - [`Course`]: A named collection of [`Exercise`]s plus the server endpoint that
//!   describes it. Exercise names are unique within a course.
//! - [`CourseInfo`]: The local manifest wrapping a course, together with the set of
//!   exercises that passed their tests locally.
//!
//! ## Ephemeral
//!
//! These exist only while a submission batch runs and are never written to disk:
//!
//! - [`RawSubmission`]: What the grading server returned for one exercise.
//! - [`SubmissionResult`]: The classified form of a raw submission.
//! - [`FeedbackQuestion`]: A survey question attached to a submission.

mod course_info;
mod exercise;
mod submission;

pub use course_info::*;
pub use exercise::*;
pub use submission::*;
