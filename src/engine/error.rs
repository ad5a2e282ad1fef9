use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::client::ClientError;

/// Errors that end a submit command.
///
/// Per-exercise problems that do not stop the command (an exercise missing on the
/// server, a failed feedback dispatch) are reported on the console instead.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Not in a course directory.")]
    NoCourse,

    #[error("Please give exercise to submit as argument")]
    NoExerciseGiven,

    #[error("Error: {0} is not a valid exercise.")]
    InvalidExercise(String),

    #[error("No exercises specified.")]
    NoExercises,

    #[error("No locally tested exercises.")]
    NoLocallyTested,

    #[error("Deadline has passed for this exercise at {deadline}")]
    DeadlinePassed {
        exercise: String,
        deadline: DateTime<Utc>,
    },

    #[error("Submission failed.")]
    Transport {
        exercise: String,
        #[source]
        source: ClientError,
    },

    #[error("Server returned unrecognized status '{status}' for {exercise}")]
    UnknownStatus { exercise: String, status: String },

    #[error("Course manifest error: {0:#}")]
    Manifest(#[from] anyhow::Error),
}

impl SubmitError {
    /// Whether the error ended a batch that had already started submitting.
    pub fn aborted_batch(&self) -> bool {
        matches!(
            self,
            Self::DeadlinePassed { .. } | Self::Transport { .. } | Self::UnknownStatus { .. }
        )
    }
}
