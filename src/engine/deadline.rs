use chrono::{DateTime, Utc};

use crate::models::Exercise;

/// Whether the exercise's deadline is already behind `now`.
///
/// Exercises without a deadline never expire.
pub fn has_passed(exercise: &Exercise, now: DateTime<Utc>) -> bool {
    exercise.deadline.is_some_and(|deadline| deadline < now)
}
