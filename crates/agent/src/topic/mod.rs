//! Topic gating: decides whether an utterance is about vaccination and
//! whether a stored assistant reply was a topic rejection.
//!
//! Both classifiers are built from the [`Lexicon`](tika_config::Lexicon), so
//! adding a language is a data change, never a code change.

pub mod classifier;
pub mod matcher;
pub mod rejection;

pub use classifier::KeywordClassifier;
pub use matcher::TermMatcher;
pub use rejection::RejectionDetector;
