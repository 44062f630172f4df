//! Recognises stored assistant replies that were topic rejections.

use tika_config::Lexicon;

use super::matcher::TermMatcher;

/// Detects whether an assistant reply is the canned "vaccination questions
/// only" response, in any language.
///
/// Matching is always substring-based: phrases are sentence fragments, not
/// single words.
#[derive(Debug, Clone)]
pub struct RejectionDetector {
    phrases: TermMatcher,
}

impl RejectionDetector {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: TermMatcher::substring(phrases),
        }
    }

    /// Phrases of every language; with `include_canned_replies` the full
    /// canned replies count as phrases too, so a language with an incomplete
    /// phrase list still recognises its own reply.
    pub fn from_lexicon(lexicon: &Lexicon, include_canned_replies: bool) -> Self {
        Self::new(lexicon.all_rejection_phrases(include_canned_replies))
    }

    pub fn is_rejection_reply(&self, text: &str) -> bool {
        self.phrases.matches(text)
    }

    pub fn phrases(&self) -> &[String] {
        self.phrases.terms()
    }
}
