//! Keyword classifier for topic triggers and follow-up terms.

use tika_config::{Lexicon, MatchMode};
use tika_core::{Error, Result};

use super::matcher::TermMatcher;

/// Decides whether an utterance is on-topic by itself (a trigger term) or
/// could continue an on-topic exchange (a follow-up term).
///
/// Terms are the union over every language of the lexicon, since spoken
/// questions freely mix languages and scripts.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    triggers: TermMatcher,
    follow_ups: TermMatcher,
}

impl KeywordClassifier {
    pub fn new(triggers: TermMatcher, follow_ups: TermMatcher) -> Self {
        Self { triggers, follow_ups }
    }

    /// Build from every language in `lexicon`.
    pub fn from_lexicon(lexicon: &Lexicon, mode: MatchMode) -> Result<Self> {
        let build = |terms: Vec<String>| {
            TermMatcher::new(terms, mode).map_err(|e| Error::Config {
                message: format!("Invalid lexicon term pattern: {e}"),
            })
        };
        Ok(Self {
            triggers: build(lexicon.all_triggers())?,
            follow_ups: build(lexicon.all_follow_ups())?,
        })
    }

    /// True iff `text` contains a topic-trigger term.
    pub fn is_topic_trigger(&self, text: &str) -> bool {
        self.triggers.matches(text)
    }

    /// True iff `text` contains a follow-up term. Only meaningful when the
    /// preceding exchange was on-topic.
    pub fn is_follow_up_term(&self, text: &str) -> bool {
        self.follow_ups.matches(text)
    }

    pub fn trigger_terms(&self) -> &[String] {
        self.triggers.terms()
    }

    pub fn follow_up_terms(&self) -> &[String] {
        self.follow_ups.terms()
    }
}
