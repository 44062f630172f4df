//! LLM, embedding and speech provider implementations for Tika.
//!
//! All chat providers implement the `tika_core::Provider` trait.
//! The router selects the correct provider based on configuration.

pub mod openai_compat;
pub mod router;
pub mod speech;

pub use openai_compat::OpenAiCompatProvider;
pub use router::{ProviderRouter, build_from_config};
pub use speech::OpenAiSpeechClient;
