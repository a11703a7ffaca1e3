use reqwest::blocking::Client;
use serde_json::{json, Value};

use super::config::SummaryConfig;
use super::error::SummaryServiceError;

/// Anything that can turn a prompt into text. The production implementation
/// is [`OpenAiClient`]; tests substitute canned or failing generators.
pub trait TextGenerator {
    /// Model identifier shown next to generated text.
    fn model(&self) -> &str;

    fn generate(&self, prompt: &str) -> Result<String, SummaryServiceError>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn model(&self) -> &str {
        (**self).model()
    }

    fn generate(&self, prompt: &str) -> Result<String, SummaryServiceError> {
        (**self).generate(prompt)
    }
}

/// Longest error body kept in [`SummaryServiceError::Status`].
const MAX_ERROR_BODY: usize = 300;

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
/// One request per call; the configured timeout covers the whole exchange.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    config: SummaryConfig,
}

impl OpenAiClient {
    pub fn new(config: SummaryConfig) -> Result<Self, SummaryServiceError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    fn build_payload(&self, prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        })
    }
}

/// Pull `choices[0].message.content` out of a chat-completions response.
pub fn parse_completion(response: &Value) -> Result<String, SummaryServiceError> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            SummaryServiceError::MalformedResponse(
                "missing choices[0].message.content".to_string(),
            )
        })
}

impl TextGenerator for OpenAiClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    fn generate(&self, prompt: &str) -> Result<String, SummaryServiceError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(SummaryServiceError::MissingCredential)?;

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&self.build_payload(prompt))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(SummaryServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response.json()?;
        parse_completion(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_model_and_sampling() {
        let client = OpenAiClient::new(SummaryConfig::default()).unwrap();
        let payload = client.build_payload("hello");
        assert_eq!(payload["model"], "gpt-3.5-turbo");
        assert_eq!(payload["max_tokens"], 600);
        assert_eq!(payload["messages"][0]["role"], "user");
        assert_eq!(payload["messages"][0]["content"], "hello");
        assert!((payload["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn completion_content_is_extracted() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "• insight" } }]
        });
        assert_eq!(parse_completion(&body).unwrap(), "• insight");
    }

    #[test]
    fn missing_content_is_malformed() {
        let body = json!({ "error": { "message": "quota exceeded" } });
        assert!(matches!(
            parse_completion(&body),
            Err(SummaryServiceError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_key_fails_before_any_request() {
        let client = OpenAiClient::new(SummaryConfig::default()).unwrap();
        assert!(matches!(
            client.generate("prompt"),
            Err(SummaryServiceError::MissingCredential)
        ));
    }
}
