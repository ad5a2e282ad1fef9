use chrono::Utc;
use tracing::{error, warn};

use super::classify::classify;
use super::deadline::has_passed;
use super::printer::ResultPrinter;
use super::{GradingService, SubmitError};
use crate::console::{Console, Tone};
use crate::models::{Exercise, FeedbackRequest, SubmissionStatus};

/// Feedback questions captured from one exercise's submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFeedback {
    pub exercise: String,
    pub request: FeedbackRequest,
}

/// Submit exercises one at a time, in order.
///
/// Each graded exercise is flagged attempted, and completed when it passed. The
/// batch stops at the first exercise whose deadline has passed, whose upload
/// fails, or whose status cannot be classified; exercises before it keep their
/// flags and nothing after it is submitted.
pub async fn submit_batch<S, C>(
    service: &S,
    console: &C,
    printer: &mut ResultPrinter,
    exercises: &mut [Exercise],
) -> Result<Vec<PendingFeedback>, SubmitError>
where
    S: GradingService,
    C: Console,
{
    let is_only_exercise = exercises.len() == 1;
    let mut feedback = Vec::new();

    for exercise in exercises.iter_mut() {
        console.highlight(&format!("Submitting: {}", exercise.name), Tone::Notice);

        let now = Utc::now();
        if has_passed(exercise, now) {
            warn!("Tried to submit exercise {} after deadline.", exercise.name);
            let err = SubmitError::DeadlinePassed {
                exercise: exercise.name.clone(),
                deadline: exercise.deadline.unwrap_or(now),
            };
            console.error(&err.to_string());
            return Err(err);
        }

        let raw = match service.submit_exercise(exercise).await {
            Ok(raw) => raw,
            Err(source) => {
                error!("Submitting {} failed: {}", exercise.name, source);
                console.error("Submission failed.");
                console.error(&source.to_string());
                if !is_only_exercise {
                    console.error("Try to submit exercises one by one.");
                }
                return Err(SubmitError::Transport {
                    exercise: exercise.name.clone(),
                    source,
                });
            }
        };

        let result = classify(raw).map_err(|status| {
            let err = SubmitError::UnknownStatus {
                exercise: exercise.name.clone(),
                status,
            };
            console.error(&err.to_string());
            err
        })?;

        printer.print_submission_result(console, &result);

        exercise.attempted = true;
        if result.status == SubmissionStatus::Ok {
            exercise.completed = true;
        }

        if let Some(request) = result.feedback {
            feedback.push(PendingFeedback {
                exercise: exercise.name.clone(),
                request,
            });
        }
        console.blank();
    }

    if !is_only_exercise {
        printer.print_total_exercise_results(console);
    }

    Ok(feedback)
}
