use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Settings for the summary text service, passed in at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 600,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }
}

impl SummaryConfig {
    /// Defaults overridden by `OPENAI_API_KEY`, `CREDIT_LENS_LLM_ENDPOINT`,
    /// `CREDIT_LENS_LLM_MODEL` and `CREDIT_LENS_LLM_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        config.api_key = non_empty("OPENAI_API_KEY");
        if let Some(endpoint) = non_empty("CREDIT_LENS_LLM_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(model) = non_empty("CREDIT_LENS_LLM_MODEL") {
            config.model = model;
        }
        if let Some(secs) = non_empty("CREDIT_LENS_LLM_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(s) => config.timeout = Duration::from_secs(s),
                Err(_) => log::warn!("Ignoring invalid CREDIT_LENS_LLM_TIMEOUT_SECS={secs}"),
            }
        }
        config
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("CREDIT_LENS_LLM_MODEL", "gpt-4o-mini"),
            ("CREDIT_LENS_LLM_TIMEOUT_SECS", "5"),
        ]
        .into();
        let config = SummaryConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.max_tokens, 600);
    }

    #[test]
    fn blank_key_counts_as_absent() {
        let config = SummaryConfig::from_lookup(|k| (k == "OPENAI_API_KEY").then(|| "  ".to_string()));
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn bad_timeout_keeps_default() {
        let config = SummaryConfig::from_lookup(|k| {
            (k == "CREDIT_LENS_LLM_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
