//! # Tika Core
//!
//! Domain types, collaborator traits, and error definitions for the Tika
//! vaccination assistant. This crate has **no framework dependencies**: it
//! defines the model every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (language model, knowledge retrieval, query
//! translation, speech recognition, speech synthesis) is a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Testing the turn pipeline with scripted stand-ins
//! - A clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod knowledge;
pub mod language;
pub mod message;
pub mod provider;
pub mod speech;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use knowledge::{KnowledgeChunk, KnowledgeRetriever, QueryTranslator};
pub use language::Language;
pub use message::{History, Role, SessionId, Turn};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use speech::{AudioClip, AudioFormat, SpeechToText, TextToSpeech};
