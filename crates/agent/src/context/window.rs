//! Topical context window over recent history.
//!
//! Walks the trailing `2 * max_turn_pairs` turns and keeps only the
//! question/answer pairs that belong to the on-going vaccination exchange:
//!
//! - a pair whose question contains a topic trigger is kept;
//! - a pair whose question only contains a follow-up term is kept when the
//!   previously examined pair was kept;
//! - a pair whose answer is a topic rejection is dropped and leaves the
//!   topic state as it was;
//! - anything else is dropped and ends the exchange.
//!
//! The result is plain text (`Question: ...` / `Answer: ...` lines) that the
//! prompt builder embeds as previous conversation.

use tika_config::{ConversationConfig, Lexicon};
use tika_core::{Result, Role, Turn};
use tracing::debug;

use crate::topic::{KeywordClassifier, RejectionDetector};

/// Builds the topical context string for a turn. Holds no per-call state:
/// the topic flag lives inside [`build_context`](Self::build_context).
#[derive(Debug, Clone)]
pub struct ContextWindowBuilder {
    classifier: KeywordClassifier,
    detector: RejectionDetector,
}

impl ContextWindowBuilder {
    pub fn new(classifier: KeywordClassifier, detector: RejectionDetector) -> Self {
        Self { classifier, detector }
    }

    pub fn from_lexicon(lexicon: &Lexicon, conversation: &ConversationConfig) -> Result<Self> {
        Ok(Self {
            classifier: KeywordClassifier::from_lexicon(lexicon, conversation.match_mode)?,
            detector: RejectionDetector::from_lexicon(lexicon, conversation.detect_canned_replies),
        })
    }

    pub fn classifier(&self) -> &KeywordClassifier {
        &self.classifier
    }

    pub fn detector(&self) -> &RejectionDetector {
        &self.detector
    }

    /// Select the relevant pairs from the last `max_turn_pairs` pairs of
    /// `history` and render them. Returns `""` when nothing qualifies.
    pub fn build_context(&self, history: &[Turn], max_turn_pairs: usize) -> String {
        if history.len() < 2 {
            return String::new();
        }

        let start = history.len().saturating_sub(max_turn_pairs.saturating_mul(2));
        let window = &history[start..];

        let mut context = String::new();
        let mut in_topic = false;
        let mut included = 0usize;
        let mut rejections = 0usize;
        let mut i = 0;

        while i + 1 < window.len() {
            let question = &window[i];
            let answer = Some(&window[i + 1]).filter(|t| t.role == Role::Assistant);

            if question.role == Role::User
                && answer.is_some_and(|a| self.detector.is_rejection_reply(&a.content))
            {
                rejections += 1;
                i += 2;
                continue;
            }

            let relevant = self.classifier.is_topic_trigger(&question.content)
                || (in_topic && self.classifier.is_follow_up_term(&question.content));

            if relevant {
                context.push_str("Question: ");
                context.push_str(&question.content);
                context.push('\n');
                if let Some(answer) = answer {
                    context.push_str("Answer: ");
                    context.push_str(&answer.content);
                    context.push('\n');
                }
                in_topic = true;
                included += 1;
                i += 2;
            } else {
                // Advance by one: the next examined "question" may be the
                // answer we just stepped past.
                in_topic = false;
                i += 1;
            }
        }

        debug!(
            window = window.len(),
            included,
            rejections,
            "Built topical context window"
        );

        let trimmed_len = context.trim_end().len();
        context.truncate(trimmed_len);
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tika_config::MatchMode;

    fn builder() -> ContextWindowBuilder {
        builder_with(MatchMode::Substring)
    }

    fn builder_with(match_mode: MatchMode) -> ContextWindowBuilder {
        let conversation = ConversationConfig {
            match_mode,
            ..ConversationConfig::default()
        };
        ContextWindowBuilder::from_lexicon(&Lexicon::builtin().unwrap(), &conversation).unwrap()
    }

    fn pairs(pairs: &[(&str, &str)]) -> Vec<Turn> {
        pairs
            .iter()
            .flat_map(|(q, a)| [Turn::user(*q), Turn::assistant(*a)])
            .collect()
    }

    const REJECTION: &str =
        "I'm sorry, I can only help with vaccination topics. Ask me only vaccination-related questions.";

    #[test]
    fn short_history_yields_empty_context() {
        let b = builder();
        assert_eq!(b.build_context(&[], 5), "");
        assert_eq!(b.build_context(&[Turn::user("vaccine for measles?")], 5), "");
    }

    #[test]
    fn single_trigger_pair() {
        let history = pairs(&[("vaccine for measles?", "It is free.")]);
        assert_eq!(
            builder().build_context(&history, 5),
            "Question: vaccine for measles?\nAnswer: It is free."
        );
    }

    #[test]
    fn follow_up_continues_topic() {
        let history = pairs(&[
            ("vaccine for measles?", "It is free."),
            ("where can I get it?", "At your local clinic."),
        ]);
        assert_eq!(
            builder().build_context(&history, 5),
            "Question: vaccine for measles?\nAnswer: It is free.\n\
             Question: where can I get it?\nAnswer: At your local clinic."
        );
    }

    #[test]
    fn off_topic_pair_breaks_continuity() {
        let history = pairs(&[
            ("vaccine for measles?", "It is free."),
            ("what's the weather?", "Sunny."),
            ("where can I get it?", "Ask at the pharmacy."),
        ]);
        assert_eq!(
            builder().build_context(&history, 5),
            "Question: vaccine for measles?\nAnswer: It is free."
        );
    }

    #[test]
    fn rejection_pair_is_excluded_and_sets_no_topic() {
        let history = pairs(&[
            ("what's the weather?", REJECTION),
            ("where can I get it?", "At the clinic."),
        ]);
        assert_eq!(builder().build_context(&history, 5), "");
    }

    #[test]
    fn rejection_pair_keeps_topic_state() {
        let history = pairs(&[
            ("vaccine for measles?", "It is free."),
            ("tell me a joke", REJECTION),
            ("where can I get it?", "At the clinic."),
        ]);
        let context = builder().build_context(&history, 5);
        assert!(!context.contains("joke"));
        assert!(!context.contains("sorry"));
        assert_eq!(
            context,
            "Question: vaccine for measles?\nAnswer: It is free.\n\
             Question: where can I get it?\nAnswer: At the clinic."
        );
    }

    #[test]
    fn hindi_rejection_is_excluded() {
        let history = pairs(&[
            ("आज मौसम कैसा है?", "माफ़ कीजिए, कृपया केवल टीकाकरण से संबंधित प्रश्न पूछें।"),
            ("खसरे का टीका कब लगता है?", "नौ महीने पर।"),
        ]);
        assert_eq!(
            builder().build_context(&history, 5),
            "Question: खसरे का टीका कब लगता है?\nAnswer: नौ महीने पर।"
        );
    }

    #[test]
    fn window_keeps_only_recent_pairs() {
        let history = pairs(&[
            ("measles vaccine?", "At 9 months."),
            ("rubella vaccine?", "With measles."),
            ("covid vaccine?", "For adults."),
        ]);
        assert_eq!(
            builder().build_context(&history, 1),
            "Question: covid vaccine?\nAnswer: For adults."
        );
    }

    #[test]
    fn zero_pairs_yields_empty_context() {
        let history = pairs(&[("measles vaccine?", "At 9 months.")]);
        assert_eq!(builder().build_context(&history, 0), "");
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let b = builder();
        let history = pairs(&[
            ("vaccine for measles?", "It is free."),
            ("what's the weather?", "Sunny."),
            ("is the covid booster needed?", "Yes, for adults."),
        ]);
        assert_eq!(b.build_context(&history, 5), b.build_context(&history, 5));
    }

    #[test]
    fn excluded_question_advances_by_one_turn() {
        // After "hello" is excluded the cursor lands on the assistant turn,
        // which is then examined as a question without an answer.
        let history = pairs(&[
            ("hello", "The measles vaccine is free."),
            ("where can I get it?", "At the clinic."),
        ]);
        assert_eq!(
            builder().build_context(&history, 5),
            "Question: The measles vaccine is free."
        );
    }

    #[test]
    fn unanswered_question_still_consumes_two_turns() {
        let history = vec![
            Turn::user("measles vaccine?"),
            Turn::user("rubella too?"),
            Turn::assistant("Both are given together."),
        ];
        assert_eq!(
            builder().build_context(&history, 5),
            "Question: measles vaccine?"
        );
    }

    #[test]
    fn word_boundary_mode_tightens_follow_ups() {
        let history = pairs(&[
            ("vaccine for measles?", "It is free."),
            ("forget it, thanks", "You're welcome."),
        ]);
        let substring = builder().build_context(&history, 5);
        assert!(substring.contains("forget it"));

        let bounded = builder_with(MatchMode::WordBoundary).build_context(&history, 5);
        assert_eq!(bounded, "Question: vaccine for measles?\nAnswer: It is free.");
    }
}
