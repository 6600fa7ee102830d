//! Lookup tables from a selector string to an extractor or translator.
//!
//! Registries are filled once at startup; a run only looks instances up.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ClientError, RunError};
use crate::services::ai::OpenAiClient;
use crate::services::extractor::{Extractor, GettextExtractor};
use crate::services::translator::{ChatTranslator, Translator};

pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Models served by the OpenAI chat-completions translator.
pub const OPENAI_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini"];

pub struct Registry<T: ?Sized> {
    entries: BTreeMap<String, Arc<T>>,
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` under `key`, replacing any previous registration.
    pub fn register(&mut self, key: impl Into<String>, value: Arc<T>) -> &mut Self {
        self.entries.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.entries.get(key).cloned()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

pub type ExtractorRegistry = Registry<dyn Extractor>;
pub type TranslatorRegistry = Registry<dyn Translator>;

impl ExtractorRegistry {
    pub fn lookup(&self, format: &str) -> Result<Arc<dyn Extractor>, RunError> {
        self.get(format).ok_or_else(|| RunError::UnsupportedFormat {
            format: format.to_string(),
            supported: self.keys(),
        })
    }
}

impl TranslatorRegistry {
    pub fn lookup(&self, model: &str) -> Result<Arc<dyn Translator>, RunError> {
        self.get(model).ok_or_else(|| RunError::UnsupportedModel {
            model: model.to_string(),
            supported: self.keys(),
        })
    }
}

/// Built-in extractors.
pub fn extractors() -> ExtractorRegistry {
    let gettext: Arc<dyn Extractor> = Arc::new(GettextExtractor);

    let mut registry = ExtractorRegistry::new();
    registry
        .register("po", gettext.clone())
        .register("pot", gettext);
    registry
}

/// Built-in translators, all backed by one OpenAI-compatible endpoint.
pub fn translators(
    api_key: &str,
    base_url: &str,
    target_language: &str,
) -> Result<TranslatorRegistry, ClientError> {
    let mut registry = TranslatorRegistry::new();

    for &model in OPENAI_MODELS {
        let client = OpenAiClient::new(api_key, base_url, model)?;
        let translator: Arc<dyn Translator> =
            Arc::new(ChatTranslator::new(client, model, target_language));
        registry.register(model, translator);
    }

    Ok(registry)
}
