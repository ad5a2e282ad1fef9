//! Submission and synchronization engine.
//!
//! A submit command runs these steps in order:
//!
//! ```text
//! select exercises        (workdir)
//!     ↓
//! migrate legacy URL      (migrate)      refreshes the course when it fires
//!     ↓
//! submit batch            (orchestrator) deadline guard + result classifier
//!     ↓
//! synchronize manifest    (sync)         single save point
//!     ↓
//! notify updates          (updates)
//!     ↓
//! collect feedback        (feedback)
//! ```
//!
//! The engine talks to the outside world only through [`GradingService`] and
//! [`Console`], and owns the [`CourseInfo`] for the duration of one command.

mod classify;
mod deadline;
mod error;
mod feedback;
mod migrate;
mod orchestrator;
mod printer;
mod sync;
mod updates;

use std::path::Path;

pub use classify::classify;
pub use deadline::has_passed;
pub use error::SubmitError;
pub use feedback::{collect_answers, send_feedbacks};
pub use migrate::{api_url_is_outdated, migrate_course, updated_details_url};
pub use orchestrator::{submit_batch, PendingFeedback};
pub use printer::ResultPrinter;
pub use sync::{update_course_info, SyncReport};
pub use updates::{notify_updates, update_message, ExerciseUpdates};

use crate::client::ClientError;
use crate::config::CURRENT_API_VERSION;
use crate::console::Console;
use crate::manifest;
use crate::models::*;
use crate::workdir::{select_exercises, WorkDir};

/// Operations the engine needs from the grading server.
///
/// Calls are awaited one at a time; the engine never has two in flight.
#[allow(async_fn_in_trait)]
pub trait GradingService {
    /// Upload an exercise and wait for its grading result.
    async fn submit_exercise(&self, exercise: &Exercise) -> Result<RawSubmission, ClientError>;

    /// The server's current exercise list for a course.
    async fn fetch_course_exercises(&self, course: &Course) -> Result<Vec<Exercise>, ClientError>;

    /// Dispatch feedback answers to the URL a submission result handed out.
    async fn send_feedback(
        &self,
        answers: &[FeedbackAnswer],
        answer_url: &str,
    ) -> Result<(), ClientError>;

    /// New and changed exercises relative to `course`.
    async fn check_updates(&self, course: &Course) -> Result<ExerciseUpdates, ClientError> {
        let server = self.fetch_course_exercises(course).await?;
        Ok(ExerciseUpdates::between(course, &server))
    }
}

/// Command-line switches of the submit command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitFlags {
    /// Show passing tests too.
    pub show_all: bool,
    /// Show detailed failure messages.
    pub show_details: bool,
    /// Submit every locally tested exercise not yet completed on the server.
    pub filter_uncompleted: bool,
}

/// Outcome of a submit command whose batch went through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub submitted: Vec<String>,
    pub passed: usize,
    pub migrated: bool,
    /// `None` when the server's exercise list could not be fetched.
    pub sync: Option<SyncReport>,
    pub saved: bool,
    pub feedback_sent: usize,
}

/// The submit command: select, submit, synchronize, notify, collect feedback.
pub struct SubmitCommand<'a, S, C> {
    service: &'a S,
    console: &'a C,
    api_version: u32,
}

impl<'a, S, C> SubmitCommand<'a, S, C>
where
    S: GradingService,
    C: Console,
{
    pub fn new(service: &'a S, console: &'a C) -> Self {
        Self {
            service,
            console,
            api_version: CURRENT_API_VERSION,
        }
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    /// Run the command. Every failure has been reported on the console by the time
    /// it is returned; the error only decides the exit status.
    pub async fn run(
        &self,
        workdir: &WorkDir,
        args: &[String],
        flags: SubmitFlags,
    ) -> Result<SubmissionReport, SubmitError> {
        let result = self.execute(workdir, args, flags).await;
        if let Err(ref e) = result {
            if !e.aborted_batch() {
                self.console.error(&e.to_string());
            }
        }
        result
    }

    async fn execute(
        &self,
        workdir: &WorkDir,
        args: &[String],
        flags: SubmitFlags,
    ) -> Result<SubmissionReport, SubmitError> {
        let manifest_path = workdir.manifest_path().ok_or(SubmitError::NoCourse)?;
        let mut info = manifest::load(&manifest_path)?;

        let selected = select_exercises(workdir, &info, args, flags.filter_uncompleted)?;

        let migrated = migrate_course(self.service, self.console, &mut info, self.api_version).await;

        let mut batch: Vec<Exercise> = selected
            .iter()
            .filter_map(|e| info.course.exercise(&e.name).cloned())
            .collect();

        let mut printer = ResultPrinter::new(flags.show_all, flags.show_details);
        let pending = match submit_batch(self.service, self.console, &mut printer, &mut batch).await
        {
            Ok(pending) => pending,
            Err(e) => {
                if migrated {
                    self.persist(&info, &manifest_path);
                }
                return Err(e);
            }
        };

        for exercise in &batch {
            info.replace_old_exercise(exercise.clone());
        }

        let sync = update_course_info(self.service, self.console, &mut info, &batch)
            .await
            .ok();
        let saved = (sync.is_some() || migrated) && self.persist(&info, &manifest_path);

        notify_updates(self.service, self.console, &info.course).await;
        let feedback_sent = send_feedbacks(self.service, self.console, &pending).await;

        Ok(SubmissionReport {
            submitted: batch.into_iter().map(|e| e.name).collect(),
            passed: printer.passed(),
            migrated,
            sync,
            saved,
            feedback_sent,
        })
    }

    /// The one place a command writes the manifest.
    fn persist(&self, info: &CourseInfo, path: &Path) -> bool {
        match manifest::save(info, path) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Saving course manifest failed: {:#}", e);
                self.console
                    .error(&format!("Failed to save course manifest: {:#}", e));
                false
            }
        }
    }
}
