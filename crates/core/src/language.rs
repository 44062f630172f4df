//! Response-language selector.

use serde::{Deserialize, Serialize};

/// A language selector token, e.g. `hindi` or `tamil`.
///
/// Tokens are normalized to trimmed lowercase so `"Hindi "` and `"hindi"`
/// select the same lexicon entry. Which tokens are valid is decided by the
/// loaded lexicon, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Language(String);

impl Language {
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(token.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Language {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.0
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
