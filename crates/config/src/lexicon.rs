//! Multilingual topic lexicon.
//!
//! Trigger terms, follow-up terms, and rejection phrases are data, keyed by
//! language. The built-in lexicon is compiled into the binary; a TOML file
//! with the same shape replaces it when `topic.lexicon_path` is set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tika_core::Language;

use crate::ConfigError;

const BUILTIN_LEXICON: &str = include_str!("../lexicon.toml");

/// Term and phrase data for one language.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageTerms {
    /// Name shown to users and to the model (e.g. "हिंदी").
    #[serde(default)]
    pub display_name: String,

    /// ISO-639-1 code passed to speech services (e.g. "hi").
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub triggers: Vec<String>,

    #[serde(default)]
    pub follow_ups: Vec<String>,

    /// The exact sentence the model must answer with for off-topic questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reply: Option<String>,

    /// Fragments that identify a stored rejection reply.
    #[serde(default)]
    pub rejection_phrases: Vec<String>,
}

/// The full lexicon: one [`LanguageTerms`] per supported language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    /// Language whose rejection reply is used when the selected one has none.
    #[serde(default = "default_fallback_language")]
    pub default_language: String,

    #[serde(default)]
    pub languages: BTreeMap<String, LanguageTerms>,
}

fn default_fallback_language() -> String {
    "english".into()
}

impl Lexicon {
    /// The lexicon shipped with Tika.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUILTIN_LEXICON, Path::new("<builtin lexicon>"))
    }

    /// Load a lexicon file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let lexicon = Self::from_toml_str(&content, path)?;
        tracing::info!(
            path = %path.display(),
            languages = lexicon.languages.len(),
            "Loaded lexicon"
        );
        Ok(lexicon)
    }

    fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let raw: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
        let lexicon = raw.normalized();
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Case-fold language keys and every term so matching can compare
    /// against case-folded input directly.
    fn normalized(self) -> Self {
        let fold = |terms: Vec<String>| -> Vec<String> {
            terms
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect()
        };

        let languages = self
            .languages
            .into_iter()
            .map(|(name, terms)| {
                let terms = LanguageTerms {
                    display_name: terms.display_name,
                    code: terms.code,
                    triggers: fold(terms.triggers),
                    follow_ups: fold(terms.follow_ups),
                    rejection_reply: terms
                        .rejection_reply
                        .map(|r| r.trim().to_string())
                        .filter(|r| !r.is_empty()),
                    rejection_phrases: fold(terms.rejection_phrases),
                };
                (Language::new(&name).as_str().to_string(), terms)
            })
            .collect();

        Self {
            default_language: Language::new(&self.default_language).as_str().to_string(),
            languages,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.is_empty() {
            return Err(ConfigError::ValidationError(
                "lexicon must define at least one language".into(),
            ));
        }

        let fallback_reply = self
            .languages
            .get(&self.default_language)
            .and_then(|t| t.rejection_reply.as_ref());

        if fallback_reply.is_none() {
            let missing: Vec<&str> = self
                .languages
                .iter()
                .filter(|(_, t)| t.rejection_reply.is_none())
                .map(|(name, _)| name.as_str())
                .collect();
            if !missing.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "languages without a rejection_reply ({}) need default language '{}' to define one",
                    missing.join(", "),
                    self.default_language
                )));
            }
        }

        Ok(())
    }

    pub fn get(&self, language: &Language) -> Option<&LanguageTerms> {
        self.languages.get(language.as_str())
    }

    pub fn supports(&self, language: &Language) -> bool {
        self.languages.contains_key(language.as_str())
    }

    /// Supported language tokens in sorted order.
    pub fn language_names(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Trigger terms of every language.
    pub fn all_triggers(&self) -> Vec<String> {
        self.languages.values().flat_map(|t| t.triggers.iter().cloned()).collect()
    }

    /// Follow-up terms of every language.
    pub fn all_follow_ups(&self) -> Vec<String> {
        self.languages.values().flat_map(|t| t.follow_ups.iter().cloned()).collect()
    }

    /// Rejection phrases of every language, optionally including each
    /// language's canned reply (case-folded).
    pub fn all_rejection_phrases(&self, include_canned_replies: bool) -> Vec<String> {
        let mut phrases: Vec<String> = self
            .languages
            .values()
            .flat_map(|t| t.rejection_phrases.iter().cloned())
            .collect();

        if include_canned_replies {
            phrases.extend(
                self.languages
                    .values()
                    .filter_map(|t| t.rejection_reply.as_ref())
                    .map(|r| r.to_lowercase()),
            );
        }

        phrases.sort();
        phrases.dedup();
        phrases
    }

    /// The canned rejection reply for `language`, falling back to the
    /// default language's reply.
    pub fn rejection_reply_for(&self, language: &Language) -> Option<&str> {
        self.get(language)
            .and_then(|t| t.rejection_reply.as_deref())
            .or_else(|| {
                self.languages
                    .get(&self.default_language)
                    .and_then(|t| t.rejection_reply.as_deref())
            })
    }

    /// Display name for `language`, or the token itself when unset.
    pub fn display_name<'a>(&'a self, language: &'a Language) -> &'a str {
        self.get(language)
            .map(|t| t.display_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(language.as_str())
    }

    /// ISO code for speech services; defaults to the default language's code.
    pub fn speech_code(&self, language: &Language) -> &str {
        self.get(language)
            .map(|t| t.code.as_str())
            .filter(|c| !c.is_empty())
            .or_else(|| {
                self.languages
                    .get(&self.default_language)
                    .map(|t| t.code.as_str())
                    .filter(|c| !c.is_empty())
            })
            .unwrap_or("en")
    }
}
