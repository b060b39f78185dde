//! Interactive shell state machine
//!
//! One submission moves the shell through
//! `Idle -> (AwaitingInput | Running -> (Success | Failed))`, or straight
//! to `Failed` when the URL is malformed. Each entered state is handed to
//! the caller's observer so a front end can render it.

use crate::summarizer::Summarizer;
use crate::types::Summary;
use crate::validate::validate;
use tracing::{error, info};

/// Where a failed submission stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Input was present but not a usable URL
    Validation,
    /// Loading, prompting or the model call failed
    Pipeline,
}

/// Coarse state tag, recorded for every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingInput,
    Running,
    Success,
    Failed,
}

/// Observable shell state
#[derive(Debug, Clone, PartialEq)]
pub enum ShellState {
    /// Nothing submitted yet
    Idle,
    /// Credential or URL missing; the user is prompted again
    AwaitingInput { message: &'static str },
    /// Pipeline in flight
    Running,
    /// Summary ready
    Success(Summary),
    /// Submission failed; `message` is safe to show to the user
    Failed { stage: FailureStage, message: String },
}

impl ShellState {
    pub fn phase(&self) -> Phase {
        match self {
            ShellState::Idle => Phase::Idle,
            ShellState::AwaitingInput { .. } => Phase::AwaitingInput,
            ShellState::Running => Phase::Running,
            ShellState::Success(_) => Phase::Success,
            ShellState::Failed { .. } => Phase::Failed,
        }
    }
}

/// Drives one summarizer through user submissions
pub struct Shell {
    summarizer: Summarizer,
    state: ShellState,
    transitions: Vec<Phase>,
}

impl Shell {
    pub fn new(summarizer: Summarizer) -> Self {
        Self {
            summarizer,
            state: ShellState::Idle,
            transitions: vec![Phase::Idle],
        }
    }

    /// Current state
    pub fn state(&self) -> &ShellState {
        &self.state
    }

    /// Phases entered during the last submission, starting with `Idle`
    pub fn transitions(&self) -> &[Phase] {
        &self.transitions
    }

    /// Submit a credential and URL
    ///
    /// Missing input never reaches the network. Pipeline errors are logged
    /// in full and surfaced with a generic message.
    pub async fn submit<F>(&mut self, credential: &str, url: &str, mut observer: F) -> &ShellState
    where
        F: FnMut(&ShellState),
    {
        self.transitions.clear();
        self.enter(ShellState::Idle, &mut observer);

        let parsed = match validate(credential, url) {
            Ok(parsed) => parsed,
            Err(e) if e.is_missing() => {
                self.enter(
                    ShellState::AwaitingInput {
                        message: e.user_message(),
                    },
                    &mut observer,
                );
                return &self.state;
            }
            Err(e) => {
                info!(url, "Rejected malformed URL");
                self.enter(
                    ShellState::Failed {
                        stage: FailureStage::Validation,
                        message: e.user_message().to_string(),
                    },
                    &mut observer,
                );
                return &self.state;
            }
        };

        self.enter(ShellState::Running, &mut observer);

        let next = match self.summarizer.summarize_url(&parsed, credential).await {
            Ok(summary) => ShellState::Success(summary),
            Err(e) => {
                error!(error = %e, url = %parsed, "Summarization failed");
                ShellState::Failed {
                    stage: FailureStage::Pipeline,
                    message: e.user_message().to_string(),
                }
            }
        };
        self.enter(next, &mut observer);

        &self.state
    }

    fn enter<F>(&mut self, state: ShellState, observer: &mut F)
    where
        F: FnMut(&ShellState),
    {
        self.transitions.push(state.phase());
        observer(&state);
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{INVALID_URL_MESSAGE, MISSING_INPUT_MESSAGE};

    fn shell() -> Shell {
        Shell::new(Summarizer::default())
    }

    #[test]
    fn test_new_shell_is_idle() {
        let shell = shell();
        assert_eq!(shell.state(), &ShellState::Idle);
        assert_eq!(shell.transitions(), &[Phase::Idle]);
    }

    #[tokio::test]
    async fn test_missing_credential_awaits_input() {
        let mut shell = shell();
        let state = shell.submit("", "https://example.com", |_| {}).await;

        assert_eq!(
            state,
            &ShellState::AwaitingInput {
                message: MISSING_INPUT_MESSAGE
            }
        );
        assert_eq!(shell.transitions(), &[Phase::Idle, Phase::AwaitingInput]);
    }

    #[tokio::test]
    async fn test_missing_url_awaits_input() {
        let mut shell = shell();
        shell.submit("gsk_123", "   ", |_| {}).await;
        assert_eq!(shell.state().phase(), Phase::AwaitingInput);
    }

    #[tokio::test]
    async fn test_malformed_url_fails_validation() {
        let mut shell = shell();
        let mut seen = Vec::new();
        shell
            .submit("gsk_123", "not a url", |s| seen.push(s.phase()))
            .await;

        assert_eq!(
            shell.state(),
            &ShellState::Failed {
                stage: FailureStage::Validation,
                message: INVALID_URL_MESSAGE.to_string(),
            }
        );
        assert_eq!(seen, vec![Phase::Idle, Phase::Failed]);
        assert!(!shell.transitions().contains(&Phase::Running));
    }

    #[tokio::test]
    async fn test_transitions_reset_per_submission() {
        let mut shell = shell();
        shell.submit("", "", |_| {}).await;
        shell.submit("gsk_123", "ftp://example.com", |_| {}).await;
        assert_eq!(shell.transitions(), &[Phase::Idle, Phase::Failed]);
    }
}
