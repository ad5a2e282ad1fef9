use tracing::warn;

use super::orchestrator::PendingFeedback;
use super::GradingService;
use crate::console::Console;
use crate::models::{FeedbackAnswer, FeedbackKind, FeedbackQuestion};

/// Offer to answer the feedback questions of each exercise that had some.
///
/// Every exercise is an independent confirm-then-dispatch step; a failed dispatch is
/// reported and the remaining exercises are still offered. Returns how many
/// feedback sets were sent.
pub async fn send_feedbacks<S, C>(service: &S, console: &C, pending: &[PendingFeedback]) -> usize
where
    S: GradingService,
    C: Console,
{
    let mut sent = 0;
    for item in pending {
        if !console.confirm(&format!("Send feedback for {}?", item.exercise), true) {
            continue;
        }

        let answers = collect_answers(console, &item.request.questions);
        if answers.is_empty() {
            console.info("No answers given, feedback not sent.");
            continue;
        }

        match service.send_feedback(&answers, &item.request.answer_url).await {
            Ok(()) => {
                console.info("Feedback sent.");
                sent += 1;
            }
            Err(e) => {
                warn!("Sending feedback for {} failed: {}", item.exercise, e);
                console.error("Failed to send feedback.");
            }
        }
    }
    sent
}

/// Ask each question in turn. Empty answers skip the question.
pub fn collect_answers(console: &impl Console, questions: &[FeedbackQuestion]) -> Vec<FeedbackAnswer> {
    questions
        .iter()
        .filter_map(|question| {
            let answer = match question.answer_kind() {
                FeedbackKind::Text => ask_text(console, &question.question),
                FeedbackKind::IntRange { min, max } => {
                    ask_in_range(console, &question.question, min, max)
                }
            }?;
            Some(FeedbackAnswer {
                question_id: question.id,
                answer,
            })
        })
        .collect()
}

fn ask_text(console: &impl Console, question: &str) -> Option<String> {
    let answer = console.prompt(question)?;
    let answer = answer.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

fn ask_in_range(console: &impl Console, question: &str, min: i64, max: i64) -> Option<String> {
    let prompt = format!("{} [{}-{}]", question, min, max);
    loop {
        let answer = console.prompt(&prompt)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return None;
        }
        match answer.parse::<i64>() {
            Ok(value) if (min..=max).contains(&value) => return Some(value.to_string()),
            _ => console.error(&format!("Please give a number between {} and {}.", min, max)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    fn questions() -> Vec<FeedbackQuestion> {
        vec![
            FeedbackQuestion {
                id: 1,
                question: "How difficult was the exercise?".to_string(),
                kind: "intrange[1..5]".to_string(),
            },
            FeedbackQuestion {
                id: 2,
                question: "Comments?".to_string(),
                kind: "text".to_string(),
            },
        ]
    }

    #[test]
    fn reprompts_until_in_range() {
        let console = ScriptedConsole::new().with_answers(["9", "abc", " 4 ", "Nice one"]);
        let answers = collect_answers(&console, &questions());

        assert_eq!(
            answers,
            vec![
                FeedbackAnswer {
                    question_id: 1,
                    answer: "4".to_string()
                },
                FeedbackAnswer {
                    question_id: 2,
                    answer: "Nice one".to_string()
                },
            ]
        );
        assert_eq!(
            console.errors(),
            vec![
                "Please give a number between 1 and 5.",
                "Please give a number between 1 and 5."
            ]
        );
        assert_eq!(console.prompts()[0], "How difficult was the exercise? [1-5]");
    }

    #[test]
    fn empty_answers_skip_questions() {
        let console = ScriptedConsole::new().with_answers(["", "  "]);
        assert!(collect_answers(&console, &questions()).is_empty());
    }

    #[test]
    fn unavailable_input_skips_questions() {
        let console = ScriptedConsole::new();
        assert!(collect_answers(&console, &questions()).is_empty());
    }
}
