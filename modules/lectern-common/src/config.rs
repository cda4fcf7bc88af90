use anyhow::{Context, Result};

use crate::language::Language;

const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";
const DEFAULT_RESULT_COUNT: usize = 10;

/// Application configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    // AI provider
    pub openai_api_key: String,
    pub api_base_url: Option<String>,
    pub chat_model: String,
    pub image_model: String,

    // Search
    pub result_count: usize,
    pub result_language: Language,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let result_count = match get("LECTERN_RESULT_COUNT") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| format!("LECTERN_RESULT_COUNT must be a positive number, got {raw:?}"))?,
            None => DEFAULT_RESULT_COUNT,
        };

        let result_language = match get("LECTERN_RESULT_LANGUAGE") {
            Some(raw) => raw.parse().context("LECTERN_RESULT_LANGUAGE")?,
            None => Language::default(),
        };

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY")
                .context("OPENAI_API_KEY environment variable is required")?,
            api_base_url: get("LECTERN_API_BASE_URL"),
            chat_model: get("LECTERN_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            image_model: get("LECTERN_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            result_count,
            result_language,
        })
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.len().min(5);
            let head = val.get(..n).unwrap_or_default();
            format!("{}...({} chars)", head, val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  OPENAI_API_KEY: {}", preview(&self.openai_api_key));
        tracing::info!(
            "  LECTERN_API_BASE_URL: {}",
            self.api_base_url.as_deref().unwrap_or("<not set>")
        );
        tracing::info!(
            chat_model = %self.chat_model,
            image_model = %self.image_model,
            result_count = self.result_count,
            result_language = %self.result_language,
            "  Models and search settings"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-abc")])).unwrap();
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.image_model, "gpt-image-1");
        assert_eq!(config.result_count, 10);
        assert_eq!(config.result_language, Language::En);
        assert!(config.api_base_url.is_none());
    }

    #[test]
    fn api_key_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn overrides_parse() {
        let config = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-abc"),
            ("LECTERN_API_BASE_URL", "http://localhost:4000/v1"),
            ("LECTERN_RESULT_COUNT", "5"),
            ("LECTERN_RESULT_LANGUAGE", "es"),
        ]))
        .unwrap();
        assert_eq!(config.result_count, 5);
        assert_eq!(config.result_language, Language::Es);
        assert_eq!(config.api_base_url.as_deref(), Some("http://localhost:4000/v1"));
    }

    #[test]
    fn bad_result_count_rejected() {
        let result = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-abc"),
            ("LECTERN_RESULT_COUNT", "zero"),
        ]));
        assert!(result.is_err());
    }
}
