//! The turn pipeline of Tika, the vaccination voice assistant.
//!
//! Each turn follows a **Gate → Select → Answer** cycle:
//!
//! 1. **Receive** an utterance (typed, or transcribed from speech)
//! 2. **Select context**: keep only the recent question/answer pairs that
//!    are about vaccination, dropping rejected off-topic exchanges
//! 3. **Retrieve** reference material when the exchange is on-topic,
//!    translating the question into the knowledge base language first
//! 4. **Send to LLM** with the topic rules and the canned rejection sentence
//! 5. **Record** the exchange in the session history and return the answer
//!
//! Topic gating is keyword-based and driven by the multilingual
//! [`Lexicon`](tika_config::Lexicon).

pub mod context;
pub mod orchestrator;
pub mod prompt;
pub mod topic;
pub mod translate;
pub mod voice;

#[cfg(test)]
mod test_helpers;

pub use context::ContextWindowBuilder;
pub use orchestrator::{TurnOrchestrator, TurnOutcome, TurnSettings};
pub use prompt::{Prompt, PromptBuilder};
pub use topic::{KeywordClassifier, RejectionDetector, TermMatcher};
pub use translate::LlmQueryTranslator;
pub use voice::{VoiceOutcome, VoicePipeline};
