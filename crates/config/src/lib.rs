//! Configuration loading, validation, and management for Tika.
//!
//! Loads configuration from `~/.tika/config.toml` with environment variable
//! overrides, and resolves the multilingual [`Lexicon`] the topic gate runs on.
//! Validates all settings at startup.

pub mod lexicon;

pub use lexicon::{LanguageTerms, Lexicon};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.tika/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Conversation and topic-gating settings
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Lexicon source
    #[serde(default)]
    pub topic: TopicConfig,

    /// Knowledge base settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Speech-to-text and text-to-speech settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "huggingface".into()
}
fn default_model() -> String {
    "mistralai/Mistral-7B-Instruct-v0.3".into()
}
fn default_temperature() -> f32 {
    0.5
}
fn default_max_tokens() -> u32 {
    512
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("conversation", &self.conversation)
            .field("topic", &self.topic)
            .field("knowledge", &self.knowledge)
            .field("speech", &self.speech)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

/// How classifier terms are matched against an utterance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Plain substring containment. Short terms can match inside longer
    /// unrelated words ("is" inside "this").
    #[default]
    Substring,
    /// Terms must start and end on a Unicode word boundary.
    WordBoundary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// How many trailing user/assistant pairs the context window examines.
    #[serde(default = "default_max_turn_pairs")]
    pub max_turn_pairs: usize,

    #[serde(default)]
    pub match_mode: MatchMode,

    /// Also treat every language's canned rejection reply as a rejection phrase.
    #[serde(default = "default_true")]
    pub detect_canned_replies: bool,

    /// Language used when none is selected.
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_max_turn_pairs() -> usize {
    5
}
fn default_true() -> bool {
    true
}
fn default_language() -> String {
    "hindi".into()
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_turn_pairs: default_max_turn_pairs(),
            match_mode: MatchMode::default(),
            detect_canned_replies: true,
            default_language: default_language(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Replace the built-in lexicon with this TOML file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexicon_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Whether retrieval runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Location of the JSON index written by `tika ingest`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_path: Option<String>,

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default)]
    pub min_score: f32,

    /// Provider used for embeddings; "none" stores chunks without vectors
    /// and retrieval falls back to keyword overlap.
    #[serde(default = "default_embedding_provider")]
    pub embedding_provider: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Language the indexed documents are written in. Questions in other
    /// languages are translated into it before retrieval.
    #[serde(default = "default_knowledge_language")]
    pub language: String,

    #[serde(default = "default_true")]
    pub translate_queries: bool,
}

fn default_top_k() -> usize {
    3
}
fn default_embedding_provider() -> String {
    "huggingface".into()
}
fn default_embedding_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".into()
}
fn default_chunk_size() -> usize {
    500
}
fn default_chunk_overlap() -> usize {
    50
}
fn default_knowledge_language() -> String {
    "english".into()
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            index_path: None,
            top_k: default_top_k(),
            min_score: 0.0,
            embedding_provider: default_embedding_provider(),
            embedding_model: default_embedding_model(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            language: default_knowledge_language(),
            translate_queries: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// "openai" (any OpenAI-compatible audio API) or "none".
    #[serde(default = "default_speech_provider")]
    pub provider: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    #[serde(default = "default_voice")]
    pub voice: String,
}

fn default_speech_provider() -> String {
    "none".into()
}
fn default_stt_model() -> String {
    "whisper-1".into()
}
fn default_tts_model() -> String {
    "tts-1".into()
}
fn default_voice() -> String {
    "nova".into()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            provider: default_speech_provider(),
            api_url: None,
            stt_model: default_stt_model(),
            tts_model: default_tts_model(),
            voice: default_voice(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.tika/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `TIKA_API_KEY` (highest priority)
    /// - `HF_TOKEN`
    /// - `OPENAI_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides, reading variables through `lookup`.
    ///
    /// A key already present in the config file wins over the environment.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = ["TIKA_API_KEY", "HF_TOKEN", "OPENAI_API_KEY"]
                .into_iter()
                .find_map(|key| lookup(key).filter(|v| !v.is_empty()));
        }

        if let Some(provider) = lookup("TIKA_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = lookup("TIKA_MODEL") {
            self.default_model = model;
        }

        if let Some(language) = lookup("TIKA_LANGUAGE") {
            self.conversation.default_language = language;
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".tika")
    }

    /// Default location of the knowledge index.
    pub fn default_index_path() -> PathBuf {
        Self::config_dir().join("knowledge").join("index.json")
    }

    /// The configured knowledge index path, or the default one.
    pub fn index_path(&self) -> PathBuf {
        self.knowledge
            .index_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_index_path)
    }

    /// Resolve the lexicon: the configured file if any, else the built-in one.
    pub fn lexicon(&self) -> Result<Lexicon, ConfigError> {
        match &self.topic.lexicon_path {
            Some(path) => Lexicon::load_from(Path::new(path)),
            None => Lexicon::builtin(),
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.conversation.max_turn_pairs == 0 {
            return Err(ConfigError::ValidationError(
                "conversation.max_turn_pairs must be at least 1".into(),
            ));
        }

        if self.knowledge.chunk_size == 0
            || self.knowledge.chunk_overlap >= self.knowledge.chunk_size
        {
            return Err(ConfigError::ValidationError(
                "knowledge.chunk_overlap must be smaller than a non-zero knowledge.chunk_size".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            conversation: ConversationConfig::default(),
            topic: TopicConfig::default(),
            knowledge: KnowledgeConfig::default(),
            speech: SpeechConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for tika_core::Error {
    fn from(e: ConfigError) -> Self {
        tika_core::Error::Config { message: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "huggingface");
        assert_eq!(config.conversation.max_turn_pairs, 5);
        assert_eq!(config.conversation.match_mode, MatchMode::Substring);
        assert_eq!(config.knowledge.top_k, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_model, config.default_model);
        assert_eq!(parsed.knowledge.chunk_size, 500);
    }

    #[test]
    fn env_overrides_follow_key_precedence() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("HF_TOKEN", "hf_test"),
            ("OPENAI_API_KEY", "sk-test"),
            ("TIKA_PROVIDER", "openai"),
            ("TIKA_MODEL", "gpt-4o-mini"),
            ("TIKA_LANGUAGE", "tamil"),
        ]);
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("hf_test"));
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.default_model, "gpt-4o-mini");
        assert_eq!(config.conversation.default_language, "tamil");

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| match key {
            "TIKA_API_KEY" => Some("tika-key".into()),
            "HF_TOKEN" => Some("hf_test".into()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("tika-key"));
        assert_eq!(config.default_provider, "huggingface");
    }

    #[test]
    fn env_never_replaces_configured_key() {
        let mut config = AppConfig {
            api_key: Some("from-file".into()),
            ..AppConfig::default()
        };
        config.apply_env_overrides(|key| (key == "TIKA_API_KEY").then(|| "from-env".to_string()));
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn knowledge_language_defaults_to_english() {
        let config: AppConfig = toml::from_str("[knowledge]\ntop_k = 2\n").unwrap();
        assert_eq!(config.knowledge.language, "english");
        assert!(config.knowledge.translate_queries);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_turn_pairs_rejected() {
        let mut config = AppConfig::default();
        config.conversation.max_turn_pairs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_turn_pairs"));
    }

    #[test]
    fn overlap_must_be_smaller_than_chunk() {
        let mut config = AppConfig::default();
        config.knowledge.chunk_overlap = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().default_provider, "huggingface");
    }

    #[test]
    fn match_mode_parses_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
[conversation]
max_turn_pairs = 3
match_mode = "word_boundary"
detect_canned_replies = false
"#,
        )
        .unwrap();
        assert_eq!(config.conversation.max_turn_pairs, 3);
        assert_eq!(config.conversation.match_mode, MatchMode::WordBoundary);
        assert!(!config.conversation.detect_canned_replies);
        assert_eq!(config.conversation.default_language, "hindi");
    }

    #[test]
    fn load_from_file_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[conversation]\nmax_turn_pairs = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn lexicon_resolves_builtin_by_default() {
        let lexicon = AppConfig::default().lexicon().unwrap();
        assert!(lexicon.supports(&tika_core::Language::new("hindi")));
    }

    #[test]
    fn lexicon_path_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.toml");
        std::fs::write(
            &path,
            "[languages.english]\ntriggers = [\"polio\"]\nrejection_reply = \"No.\"\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.topic.lexicon_path = Some(path.display().to_string());
        let lexicon = config.lexicon().unwrap();
        assert!(!lexicon.supports(&tika_core::Language::new("hindi")));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("hf_secret".into()),
            ..AppConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hf_secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("huggingface"));
        assert!(toml_str.contains("max_turn_pairs"));
    }
}
