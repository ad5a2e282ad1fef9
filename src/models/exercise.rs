use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single gradable programming task within a course.
///
/// The same shape is used for the server's exercise list and for the records kept
/// in the local manifest, so a server record can replace a local one wholesale.
/// `name` is the identity: it is unique within a course and doubles as the name of
/// the exercise directory under the course directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Server-side content checksum. A mismatch means the exercise was changed.
    #[serde(default)]
    pub checksum: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub attempted: bool,
    /// Set when the exercise passed its tests locally.
    #[serde(default)]
    pub locally_tested: bool,
}

impl Exercise {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            deadline: None,
            checksum: String::new(),
            completed: false,
            attempted: false,
            locally_tested: false,
        }
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = checksum.into();
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// A named collection of exercises plus the server endpoint describing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    pub name: String,
    /// Course detail endpoint. Old manifests carry an organization-style path here.
    pub details_url: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Course {
    pub fn exercise(&self, name: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.name == name)
    }

    pub fn exercise_mut(&mut self, name: &str) -> Option<&mut Exercise> {
        self.exercises.iter_mut().find(|e| e.name == name)
    }

    /// Replace the exercise with the same name, or append it when there is none.
    ///
    /// Never creates a duplicate name and never removes an exercise. The server
    /// knows nothing about local test runs, so `locally_tested` survives replacement.
    pub fn replace_exercise(&mut self, mut exercise: Exercise) {
        match self.exercise_mut(&exercise.name) {
            Some(existing) => {
                exercise.locally_tested |= existing.locally_tested;
                *existing = exercise;
            }
            None => self.exercises.push(exercise),
        }
    }

    /// Merge a server exercise list: matched names are replaced, unmatched server
    /// exercises are inserted, and local-only exercises are kept.
    pub fn merge_exercises(&mut self, server: Vec<Exercise>) {
        for exercise in server {
            self.replace_exercise(exercise);
        }
    }
}
