//! Wire envelopes for the grading server API.

use serde::{Deserialize, Serialize};

use crate::models::{Exercise, FeedbackAnswer};

/// Response to a course details request.
#[derive(Debug, Deserialize)]
pub struct CourseDetailsResponse {
    pub course: CourseDetails,
}

#[derive(Debug, Deserialize)]
pub struct CourseDetails {
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// Response to an accepted submission. Grading continues asynchronously.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub submission_url: String,
    #[serde(default)]
    pub show_submission_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackPayload<'a> {
    pub answers: &'a [FeedbackAnswer],
}
