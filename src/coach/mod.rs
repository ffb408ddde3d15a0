//! AI finance coach.
//!
//! This module provides the advice formatter, the generative-language API
//! client and the session-scoped chat transcript.

pub mod context;
pub mod gemini;
pub mod session;

pub use context::build_context;
pub use gemini::GeminiClient;
pub use session::{ChatCommand, ChatSession, GREETING};

use crate::error::CoachError;

/// Something that turns a prompt into advice text.
#[allow(async_fn_in_trait)]
pub trait AdviceBackend {
    async fn generate(&self, prompt: &str) -> Result<String, CoachError>;
}
