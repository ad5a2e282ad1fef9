use crate::console::{Console, Tone};
use crate::models::{SubmissionResult, SubmissionStatus, TestCase};

/// Prints submission results and keeps running totals for the batch summary.
#[derive(Debug, Default)]
pub struct ResultPrinter {
    show_all: bool,
    show_details: bool,
    passed: usize,
    total: usize,
}

impl ResultPrinter {
    pub fn new(show_all: bool, show_details: bool) -> Self {
        Self {
            show_all,
            show_details,
            ..Default::default()
        }
    }

    pub fn print_submission_result(&mut self, console: &impl Console, result: &SubmissionResult) {
        self.total += 1;

        for test in &result.test_cases {
            if !test.successful {
                self.print_failed_test(console, test);
            } else if self.show_all {
                console.highlight(&format!("  Passed: {}", test.name), Tone::Success);
            }
        }

        match result.status {
            SubmissionStatus::Ok => {
                self.passed += 1;
                console.highlight("All tests passed on server!", Tone::Success);
                if !result.points.is_empty() {
                    console.info(&format!(
                        "Points permanently awarded: [{}]",
                        result.points.join(", ")
                    ));
                }
            }
            SubmissionStatus::Fail => {
                console.info(&format!(
                    "Test results: {}/{} tests passed",
                    result.passed_tests(),
                    result.test_cases.len()
                ));
            }
            SubmissionStatus::Error => {
                console.highlight("Failed to compile or run the exercise.", Tone::Failure);
                if let Some(ref error) = result.error {
                    console.info(error);
                }
            }
        }
    }

    fn print_failed_test(&self, console: &impl Console, test: &TestCase) {
        console.highlight(&format!("  Failed: {}", test.name), Tone::Failure);
        if let Some(ref message) = test.message {
            console.info(&format!("        {}", message));
        }
        if self.show_details {
            if let Some(ref detail) = test.detailed_message {
                console.info(&format!("        {}", detail));
            }
            for line in &test.exception {
                console.info(&format!("          {}", line));
            }
        }
    }

    pub fn print_total_exercise_results(&self, console: &impl Console) {
        console.highlight(
            &format!("Total: {}/{} exercises passed", self.passed, self.total),
            Tone::Notice,
        );
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    fn test_case(name: &str, successful: bool) -> TestCase {
        TestCase {
            name: name.to_string(),
            successful,
            message: (!successful).then(|| "expected 3 but was 4".to_string()),
            detailed_message: Some("at Main.java:12".to_string()),
            exception: vec![],
        }
    }

    fn result(status: SubmissionStatus, tests: Vec<TestCase>) -> SubmissionResult {
        SubmissionResult {
            status,
            points: vec!["1.1".to_string(), "1.2".to_string()],
            test_cases: tests,
            error: None,
            feedback: None,
        }
    }

    #[test]
    fn prints_failed_tests_and_counts() {
        let console = ScriptedConsole::new();
        let mut printer = ResultPrinter::new(false, false);
        printer.print_submission_result(
            &console,
            &result(
                SubmissionStatus::Fail,
                vec![test_case("adds", true), test_case("subtracts", false)],
            ),
        );

        assert!(console.contains("Failed: subtracts"));
        assert!(console.contains("expected 3 but was 4"));
        assert!(!console.contains("Passed: adds"));
        assert!(!console.contains("Main.java"));
        assert!(console.contains("Test results: 1/2 tests passed"));
        assert_eq!((printer.passed(), printer.total()), (0, 1));
    }

    #[test]
    fn all_and_details_flags_widen_output() {
        let console = ScriptedConsole::new();
        let mut printer = ResultPrinter::new(true, true);
        printer.print_submission_result(
            &console,
            &result(
                SubmissionStatus::Fail,
                vec![test_case("adds", true), test_case("subtracts", false)],
            ),
        );

        assert!(console.contains("Passed: adds"));
        assert!(console.contains("at Main.java:12"));
    }

    #[test]
    fn totals_count_passed_exercises() {
        let console = ScriptedConsole::new();
        let mut printer = ResultPrinter::new(false, false);
        printer.print_submission_result(&console, &result(SubmissionStatus::Ok, vec![]));
        printer.print_submission_result(&console, &result(SubmissionStatus::Error, vec![]));
        printer.print_total_exercise_results(&console);

        assert!(console.contains("All tests passed on server!"));
        assert!(console.contains("Points permanently awarded: [1.1, 1.2]"));
        assert!(console.contains("Total: 1/2 exercises passed"));
    }
}
