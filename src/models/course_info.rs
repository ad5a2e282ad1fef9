use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Course, Exercise};

/// The locally persisted record of a course: what the user has on disk.
///
/// Besides the course itself this tracks the names of exercises that passed their
/// tests locally but whose completion the server has not yet confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseInfo {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub server_address: Option<String>,
    pub course: Course,
    #[serde(default)]
    pub local_completed_exercises: BTreeSet<String>,
}

impl CourseInfo {
    pub fn new(course: Course) -> Self {
        Self {
            username: None,
            server_address: None,
            course,
            local_completed_exercises: BTreeSet::new(),
        }
    }

    pub fn course_name(&self) -> &str {
        &self.course.name
    }

    pub fn is_locally_tested(&self, exercise: &Exercise) -> bool {
        exercise.locally_tested || self.local_completed_exercises.contains(&exercise.name)
    }

    pub fn replace_old_exercise(&mut self, exercise: Exercise) {
        self.course.replace_exercise(exercise);
    }
}
