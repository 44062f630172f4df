//! Provider router — selects the correct LLM provider based on config.
//!
//! Handles provider creation and lookup for chat completions and embeddings,
//! which may live on different backends.

use std::collections::HashMap;
use std::sync::Arc;
use tika_config::AppConfig;
use tika_core::provider::Provider;

use crate::openai_compat::{HUGGINGFACE_BASE_URL, HUGGINGFACE_FEATURE_EXTRACTION_URL, OpenAiCompatProvider};

/// Routes LLM requests to the correct provider.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// List all registered provider names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Build providers from configuration.
///
/// Every `[providers.<name>]` entry is registered, plus the default chat
/// provider and the knowledge embedding provider when they are not
/// configured explicitly.
pub fn build_from_config(config: &AppConfig) -> ProviderRouter {
    let mut router = ProviderRouter::new(&config.default_provider);

    for (name, provider_config) in &config.providers {
        let api_key = provider_config
            .api_key
            .clone()
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();
        let provider = match &provider_config.api_url {
            Some(url) => {
                let p = OpenAiCompatProvider::new(name, url, &api_key);
                if name == "huggingface" {
                    p.with_feature_extraction_url(HUGGINGFACE_FEATURE_EXTRACTION_URL)
                } else {
                    p
                }
            }
            None => well_known(name, &api_key),
        };
        router.register(name.clone(), Arc::new(provider));
    }

    let api_key = config.api_key.clone().unwrap_or_default();
    for name in [&config.default_provider, &config.knowledge.embedding_provider] {
        if name != "none" && router.get(name).is_none() {
            router.register(name.clone(), Arc::new(well_known(name, &api_key)));
        }
    }

    router
}

fn well_known(name: &str, api_key: &str) -> OpenAiCompatProvider {
    match name {
        "huggingface" => OpenAiCompatProvider::huggingface(api_key),
        "openai" => OpenAiCompatProvider::openai(api_key),
        "ollama" => OpenAiCompatProvider::ollama(None),
        _ => OpenAiCompatProvider::new(name, default_base_url(name), api_key),
    }
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "huggingface" => HUGGINGFACE_BASE_URL.into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
