use serde::{Deserialize, Serialize};

/// Submission outcome as reported by the grading server, before classification.
///
/// `status` is kept as the raw wire string; the engine's classifier turns it into a
/// [`SubmissionStatus`] and rejects anything it does not recognise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSubmission {
    pub status: String,
    #[serde(default)]
    pub all_tests_passed: Option<bool>,
    #[serde(default)]
    pub points: Vec<String>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    /// Compiler or runner output when grading errored.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub feedback_questions: Option<Vec<FeedbackQuestion>>,
    #[serde(default)]
    pub feedback_answer_url: Option<String>,
}

/// Final grading status of a submission.
///
/// - `Ok`: every test passed
/// - `Fail`: the code ran but some tests failed
/// - `Error`: the submission could not be graded (compile error, timeout, ...)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Ok,
    Fail,
    Error,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Fail => "fail",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ok" => Some(Self::Ok),
            "fail" => Some(Self::Fail),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Server status string for a submission still waiting in the grading queue.
pub const PROCESSING_STATUS: &str = "processing";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub successful: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detailed_message: Option<String>,
    #[serde(default)]
    pub exception: Vec<String>,
}

/// A classified submission result.
#[derive(Debug, Clone)]
pub struct SubmissionResult {
    pub status: SubmissionStatus,
    pub points: Vec<String>,
    pub test_cases: Vec<TestCase>,
    pub error: Option<String>,
    /// Present only when the server asked questions and gave somewhere to answer them.
    pub feedback: Option<FeedbackRequest>,
}

impl SubmissionResult {
    pub fn passed_tests(&self) -> usize {
        self.test_cases.iter().filter(|t| t.successful).count()
    }
}

/// Feedback questions attached to a submission together with their answer endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRequest {
    pub questions: Vec<FeedbackQuestion>,
    pub answer_url: String,
}

/// A post-submission survey question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackQuestion {
    pub id: u64,
    pub question: String,
    /// `text` or `intrange[min..max]`.
    #[serde(default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "text".to_string()
}

/// How a feedback question expects to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Text,
    IntRange { min: i64, max: i64 },
}

impl FeedbackQuestion {
    /// Unknown kinds are answered as free text.
    pub fn answer_kind(&self) -> FeedbackKind {
        parse_int_range(&self.kind).unwrap_or(FeedbackKind::Text)
    }
}

fn parse_int_range(kind: &str) -> Option<FeedbackKind> {
    let range = kind.strip_prefix("intrange[")?.strip_suffix(']')?;
    let (min, max) = range.split_once("..")?;
    let min = min.trim().parse().ok()?;
    let max = max.trim().parse().ok()?;
    (min <= max).then_some(FeedbackKind::IntRange { min, max })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackAnswer {
    pub question_id: u64,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(kind: &str) -> FeedbackQuestion {
        FeedbackQuestion {
            id: 1,
            question: "How hard was it?".to_string(),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn parses_int_range_kind() {
        assert_eq!(
            question("intrange[1..5]").answer_kind(),
            FeedbackKind::IntRange { min: 1, max: 5 }
        );
    }

    #[test]
    fn unknown_and_malformed_kinds_are_text() {
        assert_eq!(question("text").answer_kind(), FeedbackKind::Text);
        assert_eq!(question("slider").answer_kind(), FeedbackKind::Text);
        assert_eq!(question("intrange[5..1]").answer_kind(), FeedbackKind::Text);
        assert_eq!(question("intrange[a..b]").answer_kind(), FeedbackKind::Text);
    }

    #[test]
    fn status_strings_are_closed() {
        assert_eq!(SubmissionStatus::parse("ok"), Some(SubmissionStatus::Ok));
        assert_eq!(SubmissionStatus::parse("fail"), Some(SubmissionStatus::Fail));
        assert_eq!(SubmissionStatus::parse("error"), Some(SubmissionStatus::Error));
        assert_eq!(SubmissionStatus::parse(PROCESSING_STATUS), None);
        assert_eq!(SubmissionStatus::parse("OK"), None);
    }
}
