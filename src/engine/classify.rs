use crate::models::{FeedbackRequest, RawSubmission, SubmissionResult, SubmissionStatus};

/// Turn a raw server result into a [`SubmissionResult`].
///
/// Fails with the offending status string when the server reports a status outside
/// {ok, fail, error}. An empty question list, or questions without an answer URL,
/// mean there is no feedback to collect.
pub fn classify(raw: RawSubmission) -> Result<SubmissionResult, String> {
    let status = SubmissionStatus::parse(&raw.status).ok_or_else(|| raw.status.clone())?;

    let feedback = match (raw.feedback_questions, raw.feedback_answer_url) {
        (Some(questions), Some(answer_url)) if !questions.is_empty() => Some(FeedbackRequest {
            questions,
            answer_url,
        }),
        (Some(questions), None) if !questions.is_empty() => {
            tracing::warn!("Submission has feedback questions but no answer URL");
            None
        }
        _ => None,
    };

    Ok(SubmissionResult {
        status,
        points: raw.points,
        test_cases: raw.test_cases,
        error: raw.error,
        feedback,
    })
}
