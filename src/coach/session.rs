//! Chat session state.
//!
//! A [`ChatSession`] owns the transcript and the backend for one user
//! session. It is created when the coach is first used and cleared only by
//! [`ChatSession::reset`].

use crate::coach::context::build_prompt;
use crate::coach::AdviceBackend;
use crate::error::CoachError;
use crate::models::ChatTurn;
use tracing::{debug, warn};

/// Opening assistant message of every transcript.
pub const GREETING: &str = "Hi! 👋 I’m your AI Finance Coach. Ask me anything about your spending, savings, or financial health.";

/// One line of input in the interactive chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand<'a> {
    Ask(&'a str),
    History,
    Reset,
    Quit,
    Empty,
}

impl<'a> ChatCommand<'a> {
    pub fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => ChatCommand::Empty,
            "/quit" | "/exit" | "/q" => ChatCommand::Quit,
            "/reset" => ChatCommand::Reset,
            "/history" => ChatCommand::History,
            question => ChatCommand::Ask(question),
        }
    }
}

/// Append-only conversation with the coach.
///
/// A question and its answer are committed together. When the backend
/// fails, the question is rolled back so the transcript never holds an
/// unanswered user turn.
pub struct ChatSession<B> {
    backend: B,
    context: String,
    transcript: Vec<ChatTurn>,
}

impl<B: AdviceBackend> ChatSession<B> {
    /// Start a session with the greeting as the only turn.
    pub fn new(backend: B, context: String) -> Self {
        Self {
            backend,
            context,
            transcript: vec![ChatTurn::assistant(GREETING)],
        }
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Number of completed question/answer pairs.
    pub fn turns(&self) -> usize {
        (self.transcript.len() - 1) / 2
    }

    /// Clear the conversation back to the greeting.
    pub fn reset(&mut self) {
        debug!("Resetting chat transcript ({} turns)", self.turns());
        self.transcript.truncate(1);
    }

    /// Ask one question and return the coach's answer.
    pub async fn ask(&mut self, question: &str) -> Result<&ChatTurn, CoachError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(CoachError::EmptyQuestion);
        }

        let prompt = build_prompt(&self.context, &self.transcript, question);

        match self.backend.generate(&prompt).await {
            Ok(answer) => {
                self.transcript.push(ChatTurn::user(question));
                self.transcript.push(ChatTurn::assistant(answer));
                Ok(&self.transcript[self.transcript.len() - 1])
            }
            Err(e) => {
                warn!("Coach request failed: {}", e);
                Err(e)
            }
        }
    }
}
