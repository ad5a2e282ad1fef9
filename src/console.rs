//! User-facing terminal output and prompts.
//!
//! Everything the user reads goes through [`Console`]; diagnostics go to `tracing`.

use std::collections::VecDeque;
use std::sync::Mutex;

use colored::Colorize;
use dialoguer::{Confirm, Input};

/// Emphasis for a highlighted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Notice,
    Success,
    Failure,
}

pub trait Console {
    fn info(&self, text: &str);

    fn error(&self, text: &str);

    fn highlight(&self, text: &str, tone: Tone);

    fn blank(&self) {
        self.info("");
    }

    /// Ask a yes/no question. Returns `default` when no answer can be read.
    fn confirm(&self, prompt: &str, default: bool) -> bool;

    /// Read one line of free text. `None` when input is unavailable.
    fn prompt(&self, prompt: &str) -> Option<String>;
}

/// Interactive terminal backed by stdout/stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct Terminal;

impl Console for Terminal {
    fn info(&self, text: &str) {
        println!("{}", text);
    }

    fn error(&self, text: &str) {
        eprintln!("{}", text);
    }

    fn highlight(&self, text: &str, tone: Tone) {
        let styled = match tone {
            Tone::Notice => text.yellow(),
            Tone::Success => text.green(),
            Tone::Failure => text.red(),
        };
        println!("{}", styled);
    }

    fn confirm(&self, prompt: &str, default: bool) -> bool {
        match Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Could not read confirmation, assuming {}: {}", default, e);
                default
            }
        }
    }

    fn prompt(&self, prompt: &str) -> Option<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| tracing::warn!("Could not read input: {}", e))
            .ok()
    }
}

/// Which stream a recorded line went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

/// In-memory console with scripted answers, for driving the engine in tests.
///
/// Test support only: it is public so the integration specs under `tests/` can
/// run [`SubmitCommand`](crate::engine::SubmitCommand) without a terminal. The
/// `tmc` binary never constructs it.
///
/// Confirmations and text answers are consumed in order; once exhausted,
/// confirmations fall back to the prompt's default and text prompts return `None`.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    lines: Mutex<Vec<(Stream, String)>>,
    confirmations: Mutex<VecDeque<bool>>,
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_confirmations(self, answers: impl IntoIterator<Item = bool>) -> Self {
        lock(&self.confirmations).extend(answers);
        self
    }

    pub fn with_answers<S: Into<String>>(self, answers: impl IntoIterator<Item = S>) -> Self {
        lock(&self.answers).extend(answers.into_iter().map(Into::into));
        self
    }

    pub fn lines(&self) -> Vec<(Stream, String)> {
        lock(&self.lines).clone()
    }

    /// All output, both streams, one line per entry.
    pub fn output(&self) -> String {
        lock(&self.lines)
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn errors(&self) -> Vec<String> {
        lock(&self.lines)
            .iter()
            .filter(|(stream, _)| *stream == Stream::Err)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        lock(&self.lines).iter().any(|(_, text)| text.contains(needle))
    }

    /// Every confirmation and text prompt shown, in order.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    fn push(&self, stream: Stream, text: &str) {
        lock(&self.lines).push((stream, text.to_string()));
    }
}

impl Console for ScriptedConsole {
    fn info(&self, text: &str) {
        self.push(Stream::Out, text);
    }

    fn error(&self, text: &str) {
        self.push(Stream::Err, text);
    }

    fn highlight(&self, text: &str, _tone: Tone) {
        self.push(Stream::Out, text);
    }

    fn confirm(&self, prompt: &str, default: bool) -> bool {
        lock(&self.prompts).push(prompt.to_string());
        lock(&self.confirmations).pop_front().unwrap_or(default)
    }

    fn prompt(&self, prompt: &str) -> Option<String> {
        lock(&self.prompts).push(prompt.to_string());
        lock(&self.answers).pop_front()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
