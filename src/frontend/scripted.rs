//! Deterministic frontend that replays a fixed answer sequence.
//!
//! Used by unit, property and integration tests to drive the confirmation
//! gate without a terminal.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::core::errors::MirrorError;
use crate::frontend::Frontend;

/// Frontend that answers prompts from a queue and records everything it sees.
///
/// When the queue runs dry every further prompt is answered with `q`, so a
/// test that under-specifies answers aborts instead of hanging.
#[derive(Debug, Default)]
pub struct ScriptedFrontend {
    answers: Mutex<VecDeque<char>>,
    prompts: Mutex<Vec<String>>,
    progress: Mutex<Vec<String>>,
    fatals: Mutex<Vec<String>>,
}

impl ScriptedFrontend {
    /// Frontend that will answer with `answers`, in order.
    pub fn new(answers: impl IntoIterator<Item = char>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Frontend for runs that must never prompt.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Prompts shown so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Progress messages received so far.
    pub fn progress_messages(&self) -> Vec<String> {
        self.progress.lock().clone()
    }

    /// Fatal reports received so far, rendered with `Display`.
    pub fn fatals(&self) -> Vec<String> {
        self.fatals.lock().clone()
    }

    /// Answers not yet consumed.
    pub fn remaining_answers(&self) -> usize {
        self.answers.lock().len()
    }
}

impl Frontend for ScriptedFrontend {
    fn progress(&self, message: &str) {
        self.progress.lock().push(message.to_string());
    }

    fn fatal(&self, error: &MirrorError) {
        self.fatals.lock().push(error.to_string());
    }

    fn choice(&self, prompt: &str, options: &[char]) -> char {
        self.prompts.lock().push(prompt.to_string());
        let mut answers = self.answers.lock();
        // Mirror the console: characters outside `options` are re-prompted.
        while let Some(answer) = answers.pop_front() {
            if options.contains(&answer) {
                return answer;
            }
        }
        'q'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_are_replayed_in_order() {
        let frontend = ScriptedFrontend::new(['y', 'n']);
        assert_eq!(frontend.choice("first", &['y', 'n']), 'y');
        assert_eq!(frontend.choice("second", &['y', 'n']), 'n');
        assert_eq!(frontend.prompts(), vec!["first", "second"]);
    }

    #[test]
    fn invalid_answers_are_skipped() {
        let frontend = ScriptedFrontend::new(['z', '?', 'a']);
        assert_eq!(frontend.choice("p", &['y', 'a']), 'a');
        assert_eq!(frontend.remaining_answers(), 0);
    }

    #[test]
    fn exhausted_script_quits() {
        let frontend = ScriptedFrontend::silent();
        assert_eq!(frontend.choice("p", &['y', 'q']), 'q');
    }
}
