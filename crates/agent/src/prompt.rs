//! Prompt composition for one turn.
//!
//! The model gets a system instruction (role, topic rules, the exact
//! rejection sentence, answer language) and a user message carrying the
//! reference material, the topical context and the new question. Sections
//! with nothing to show are left out.

use tika_core::{KnowledgeChunk, Turn};

const ROLE_DESCRIPTION: &str = "You are a knowledgeable assistant specializing in vaccines and \
immunization in India. Give clear, concise, conversational answers that directly address the \
question. If the reference material does not fully answer the question, say so honestly and \
avoid guessing.";

/// The rendered prompt for a single model call.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// System instruction followed by the user message.
    pub fn into_messages(self) -> Vec<Turn> {
        vec![Turn::system(self.system), Turn::user(self.user)]
    }
}

/// Builder for a [`Prompt`].
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder<'a> {
    language_name: &'a str,
    rejection_reply: Option<&'a str>,
    trigger_terms: &'a [String],
    follow_up_terms: &'a [String],
    knowledge: &'a [KnowledgeChunk],
    context: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// `language_name` is what the model is told to answer in.
    pub fn new(language_name: &'a str) -> Self {
        Self {
            language_name,
            ..Self::default()
        }
    }

    pub fn rejection_reply(mut self, reply: Option<&'a str>) -> Self {
        self.rejection_reply = reply;
        self
    }

    pub fn topic_terms(mut self, triggers: &'a [String], follow_ups: &'a [String]) -> Self {
        self.trigger_terms = triggers;
        self.follow_up_terms = follow_ups;
        self
    }

    pub fn knowledge(mut self, chunks: &'a [KnowledgeChunk]) -> Self {
        self.knowledge = chunks;
        self
    }

    pub fn context(mut self, context: &'a str) -> Self {
        self.context = context;
        self
    }

    pub fn build(&self, utterance: &str) -> Prompt {
        Prompt {
            system: self.render_system(),
            user: self.render_user(utterance),
        }
    }

    fn render_system(&self) -> String {
        let mut sections = vec![ROLE_DESCRIPTION.to_string()];

        if !self.trigger_terms.is_empty() {
            let mut rules = format!(
                "Only answer questions about vaccination. A question is about vaccination when it \
                 mentions any of: {}.",
                self.trigger_terms.join(", ")
            );
            if !self.follow_up_terms.is_empty() {
                rules.push_str(&format!(
                    " A question that mentions any of: {} continues the previous vaccination \
                     discussion and should be answered as part of it.",
                    self.follow_up_terms.join(", ")
                ));
            }
            sections.push(rules);
        }

        if let Some(reply) = self.rejection_reply {
            sections.push(format!(
                "If the question is not about vaccination, reply with exactly this sentence and \
                 nothing else: \"{reply}\""
            ));
        }

        if !self.language_name.is_empty() {
            sections.push(format!("Reply in {}.", self.language_name));
        }

        sections.join("\n\n")
    }

    fn render_user(&self, utterance: &str) -> String {
        let mut sections = Vec::new();

        if !self.knowledge.is_empty() {
            let mut s = String::from("## Reference material\n");
            for (i, chunk) in self.knowledge.iter().enumerate() {
                s.push_str(&format!("[{}] ({}) {}\n", i + 1, chunk.source, chunk.content.trim()));
            }
            sections.push(s.trim_end().to_string());
        }

        if !self.context.is_empty() {
            sections.push(format!("## Previous conversation\n{}", self.context));
        }

        sections.push(format!("Question: {}\nAnswer:", utterance.trim()));
        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tika_core::Role;

    fn chunk(source: &str, content: &str) -> KnowledgeChunk {
        KnowledgeChunk {
            document_id: source.into(),
            chunk_index: 0,
            content: content.into(),
            source: source.into(),
            similarity: 0.9,
        }
    }

    #[test]
    fn minimal_prompt_has_role_language_and_question() {
        let prompt = PromptBuilder::new("हिंदी").build("  खसरे का टीका?  ");
        assert!(prompt.system.starts_with("You are a knowledgeable assistant"));
        assert!(prompt.system.ends_with("Reply in हिंदी."));
        assert_eq!(prompt.user, "Question: खसरे का टीका?\nAnswer:");
    }

    #[test]
    fn canned_reply_is_quoted_verbatim() {
        let reply = "Ask me only vaccination-related questions.";
        let prompt = PromptBuilder::new("English")
            .rejection_reply(Some(reply))
            .build("tell me a joke");
        assert!(prompt.system.contains(&format!("\"{reply}\"")));
    }

    #[test]
    fn topic_terms_are_restated() {
        let triggers = vec!["vaccine".to_string(), "measles".to_string()];
        let follow_ups = vec!["where".to_string()];
        let prompt = PromptBuilder::new("English")
            .topic_terms(&triggers, &follow_ups)
            .build("where?");
        assert!(prompt.system.contains("vaccine, measles"));
        assert!(prompt.system.contains("any of: where continues"));
    }

    #[test]
    fn knowledge_and_context_sections_in_order() {
        let chunks = vec![chunk("uip.txt", "MR vaccine is given at 9 months.\n")];
        let context = "Question: measles vaccine?\nAnswer: It is free.";
        let prompt = PromptBuilder::new("English")
            .knowledge(&chunks)
            .context(context)
            .build("where can I get it?");

        let reference = prompt.user.find("## Reference material").unwrap();
        let previous = prompt.user.find("## Previous conversation").unwrap();
        let question = prompt.user.find("Question: where can I get it?").unwrap();
        assert!(reference < previous && previous < question);
        assert!(prompt.user.contains("[1] (uip.txt) MR vaccine is given at 9 months.\n"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let prompt = PromptBuilder::new("English").build("hi");
        assert!(!prompt.user.contains("Reference material"));
        assert!(!prompt.user.contains("Previous conversation"));
        assert!(!prompt.system.contains("reply with exactly"));
    }

    #[test]
    fn into_messages_orders_system_then_user() {
        let messages = PromptBuilder::new("English").build("hi").into_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }
}
