use tracing::warn;

use super::GradingService;
use crate::console::{Console, Tone};
use crate::models::{Course, Exercise};

/// Exercises the server has that the local course lacks or holds an older copy of.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseUpdates {
    pub new_exercises: Vec<Exercise>,
    pub updated_exercises: Vec<Exercise>,
}

impl ExerciseUpdates {
    /// Compare a local course with the server's exercise list. An exercise counts as
    /// updated when both sides have it and the checksums differ.
    pub fn between(local: &Course, server: &[Exercise]) -> Self {
        let mut updates = Self::default();
        for exercise in server {
            match local.exercise(&exercise.name) {
                None => updates.new_exercises.push(exercise.clone()),
                Some(existing) if existing.checksum != exercise.checksum => {
                    updates.updated_exercises.push(exercise.clone())
                }
                Some(_) => {}
            }
        }
        updates
    }

    pub fn is_empty(&self) -> bool {
        self.new_exercises.is_empty() && self.updated_exercises.is_empty()
    }

    pub fn message(&self) -> Option<String> {
        update_message(self.new_exercises.len(), self.updated_exercises.len())
    }
}

/// Compose the update notice, or `None` when there is nothing to report.
pub fn update_message(new: usize, updated: usize) -> Option<String> {
    if new == 0 && updated == 0 {
        return None;
    }

    let mut msg = String::new();
    if new > 0 {
        let plural = if new > 1 { "s" } else { "" };
        msg.push_str(&format!("{} new exercise{} available!\n", new, plural));
    }
    if updated > 0 {
        let plural = if updated > 1 { "s have" } else { " has" };
        msg.push_str(&format!(
            "{} exercise{} been changed on TMC server.\n",
            updated, plural
        ));
    }
    let pronoun = if new + updated > 1 { "them" } else { "it" };
    msg.push_str(&format!("Use 'tmc update' to download {}.", pronoun));

    Some(msg)
}

/// Tell the user about new or changed exercises. Purely advisory.
pub async fn notify_updates<S, C>(service: &S, console: &C, course: &Course)
where
    S: GradingService,
    C: Console,
{
    let updates = match service.check_updates(course).await {
        Ok(updates) => updates,
        Err(e) => {
            warn!("Checking for exercise updates failed: {}", e);
            return;
        }
    };

    if let Some(msg) = updates.message() {
        console.blank();
        console.highlight(&msg, Tone::Notice);
    }
}
