//! Context selection over session history.
//!
//! Only the question/answer pairs that belong to the current vaccination
//! exchange reach the prompt. Rejected off-topic exchanges never do.

pub mod window;

pub use window::ContextWindowBuilder;
