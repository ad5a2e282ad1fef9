//! HTTP client for the TMC grading server.
//!
//! Paths are resolved against the configured server address; absolute URLs handed
//! out by the server (course details, submission status, feedback answers) are used
//! as they are. Every request carries the bearer token when one is configured, plus
//! the `client` and `client_version` query parameters.

mod types;

pub use types::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::config::{Settings, CLIENT_NAME, CURRENT_API_VERSION};
use crate::engine::GradingService;
use crate::models::*;

/// Default delay between submission status polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default number of status polls before giving up on a submission.
const DEFAULT_MAX_POLLS: u32 = 150;

/// Multipart field carrying one exercise file.
const FILE_FIELD: &str = "submission[files][]";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: log in again with 'tmc login'")]
    Unauthorized,

    #[error("Server error: {0}")]
    Server(String),

    #[error("Exercise directory not found: {0}")]
    MissingExercise(PathBuf),

    #[error("Could not read exercise files: {0}")]
    Io(#[from] std::io::Error),

    #[error("Submission was not graded in time: {url}")]
    Timeout { url: String },
}

/// HTTP client for the grading server.
#[derive(Debug, Clone)]
pub struct GradingClient {
    base_url: String,
    token: Option<String>,
    api_version: u32,
    course_dir: PathBuf,
    poll_interval: Duration,
    max_polls: u32,
    client: Client,
}

impl GradingClient {
    /// Create client from settings. Exercise files are read from `course_dir`.
    pub fn from_settings(settings: &Settings, course_dir: impl Into<PathBuf>) -> Self {
        Self::new(&settings.server_address, settings.token.clone(), course_dir)
            .with_api_version(settings.api_version)
    }

    /// Create with explicit configuration.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        course_dir: impl Into<PathBuf>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token,
            api_version: CURRENT_API_VERSION,
            course_dir: course_dir.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
            client: Client::new(),
        }
    }

    pub fn with_api_version(mut self, version: u32) -> Self {
        self.api_version = version;
        self
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    /// Build a request with auth header and client identification.
    fn request(&self, method: Method, path_or_url: &str) -> reqwest::RequestBuilder {
        let url = if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else {
            format!("{}{}", self.base_url, path_or_url)
        };
        let mut req = self.client.request(method, &url).query(&[
            ("client", CLIENT_NAME),
            ("client_version", env!("CARGO_PKG_VERSION")),
        ]);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            _ => Err(ClientError::Server(format!("{}: {}", status, body))),
        }
    }

    // ============================================================
    // Course Operations
    // ============================================================

    /// Fetch the canonical exercise list from the course details endpoint.
    pub async fn get_course_exercises(&self, course: &Course) -> Result<Vec<Exercise>, ClientError> {
        let response = self
            .request(Method::GET, &course.details_url)
            .send()
            .await?;
        let details: CourseDetailsResponse = self.handle_response(response).await?;
        Ok(details.course.exercises)
    }

    // ============================================================
    // Submission Operations
    // ============================================================

    /// Upload an exercise and wait until the server has graded it.
    pub async fn submit(&self, exercise: &Exercise) -> Result<RawSubmission, ClientError> {
        let form = self.package(exercise)?;
        let path = format!(
            "/api/v{}/core/exercises/{}/submissions",
            self.api_version, exercise.id
        );

        let response = self
            .request(Method::POST, &path)
            .multipart(form)
            .send()
            .await?;
        let accepted: SubmitResponse = self.handle_response(response).await?;
        if let Some(ref url) = accepted.show_submission_url {
            tracing::info!("Submission of {} accepted: {}", exercise.name, url);
        }

        self.wait_for_result(&accepted.submission_url).await
    }

    /// Poll the submission status until grading has finished.
    async fn wait_for_result(&self, submission_url: &str) -> Result<RawSubmission, ClientError> {
        for attempt in 1..=self.max_polls {
            let response = self
                .request(Method::GET, submission_url)
                .send()
                .await?;
            let result: RawSubmission = self.handle_response(response).await?;
            if result.status != PROCESSING_STATUS {
                return Ok(result);
            }
            tracing::debug!("Submission still processing (poll {})", attempt);
            tokio::time::sleep(self.poll_interval).await;
        }

        Err(ClientError::Timeout {
            url: submission_url.to_string(),
        })
    }

    /// Collect the exercise directory into a multipart form, one part per file.
    fn package(&self, exercise: &Exercise) -> Result<Form, ClientError> {
        let dir = self.course_dir.join(&exercise.name);
        if !dir.is_dir() {
            return Err(ClientError::MissingExercise(dir));
        }

        let mut form = Form::new();
        for entry in WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped(e))
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = relative_name(&dir, entry.path());
            let part = Part::bytes(fs::read(entry.path())?).file_name(name);
            form = form.part(FILE_FIELD, part);
        }
        Ok(form)
    }

    // ============================================================
    // Feedback Operations
    // ============================================================

    /// Send feedback answers to the endpoint the submission result pointed at.
    pub async fn send_answers(
        &self,
        answers: &[FeedbackAnswer],
        answer_url: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .request(Method::POST, answer_url)
            .json(&FeedbackPayload { answers })
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

/// Hidden entries and build output never leave the machine.
fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && name == "target")
}

fn relative_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl GradingService for GradingClient {
    async fn submit_exercise(&self, exercise: &Exercise) -> Result<RawSubmission, ClientError> {
        self.submit(exercise).await
    }

    async fn fetch_course_exercises(&self, course: &Course) -> Result<Vec<Exercise>, ClientError> {
        self.get_course_exercises(course).await
    }

    async fn send_feedback(
        &self,
        answers: &[FeedbackAnswer],
        answer_url: &str,
    ) -> Result<(), ClientError> {
        self.send_answers(answers, answer_url).await
    }
}
