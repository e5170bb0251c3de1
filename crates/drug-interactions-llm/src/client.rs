//! Language-model clients.

use std::fmt;
use std::sync::Mutex;

use drug_interactions_core::{ExtractionError, ExtractionResult};
use serde::{Deserialize, Serialize};

/// Env var holding the Hugging Face API token.
pub const ENV_TOKEN: &str = "HF_TOKEN";
/// Env var overriding [`InferenceConfig::model`].
pub const ENV_MODEL: &str = "DRUG_INTERACTIONS_MODEL";
/// Env var overriding [`InferenceConfig::endpoint`].
pub const ENV_ENDPOINT: &str = "DRUG_INTERACTIONS_INFERENCE_ENDPOINT";

/// Text generation backend.
pub trait LlmClient: Send + Sync {
    /// Model identifier, for logs.
    fn model(&self) -> &str;

    /// Generate a completion for `prompt`. One attempt; no retries.
    fn generate(&self, prompt: &str) -> ExtractionResult<String>;
}

/// Hosted inference settings.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL of the inference API
    pub endpoint: String,
    /// Model repository id
    pub model: String,
    pub max_new_tokens: u32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// API token; read from `HF_TOKEN` rather than written to config files
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co".into(),
            model: "ibm-granite/granite-3.3-2b-instruct".into(),
            max_new_tokens: 200,
            timeout_secs: 60,
            token: None,
        }
    }
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_new_tokens", &self.max_new_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl InferenceConfig {
    /// Apply environment overrides on top of `self`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_TOKEN).filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.model = model;
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        self
    }

    /// Full URL for the configured model.
    pub fn model_url(&self) -> String {
        format!("{}/models/{}", self.endpoint.trim_end_matches('/'), self.model)
    }
}

#[cfg(feature = "http")]
pub use http::HuggingFaceClient;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use super::{ExtractionError, ExtractionResult, InferenceConfig, LlmClient};

    /// Hugging Face text-generation client (blocking).
    pub struct HuggingFaceClient {
        client: reqwest::blocking::Client,
        config: InferenceConfig,
        token: String,
    }

    impl HuggingFaceClient {
        /// Create a client. Fails when no token is configured.
        pub fn new(config: InferenceConfig) -> ExtractionResult<Self> {
            let token = config
                .token
                .clone()
                .ok_or_else(|| ExtractionError::Unavailable(format!("{} is not set", super::ENV_TOKEN)))?;

            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .map_err(|e| ExtractionError::Unavailable(e.to_string()))?;

            Ok(Self { client, config, token })
        }
    }

    #[derive(Serialize)]
    struct GenerateRequest<'a> {
        inputs: &'a str,
        parameters: GenerateParameters,
    }

    #[derive(Serialize)]
    struct GenerateParameters {
        max_new_tokens: u32,
        return_full_text: bool,
    }

    #[derive(Deserialize)]
    struct GeneratedText {
        generated_text: String,
    }

    impl LlmClient for HuggingFaceClient {
        fn model(&self) -> &str {
            &self.config.model
        }

        fn generate(&self, prompt: &str) -> ExtractionResult<String> {
            let body = GenerateRequest {
                inputs: prompt,
                parameters: GenerateParameters {
                    max_new_tokens: self.config.max_new_tokens,
                    return_full_text: false,
                },
            };

            let response = self
                .client
                .post(self.config.model_url())
                .bearer_auth(&self.token)
                .json(&body)
                .send()
                .map_err(|e| {
                    if e.is_connect() {
                        ExtractionError::Inference(format!("cannot reach {}", self.config.endpoint))
                    } else if e.is_timeout() {
                        ExtractionError::Inference(format!(
                            "request timed out after {}s",
                            self.config.timeout_secs
                        ))
                    } else {
                        ExtractionError::Inference(e.to_string())
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(ExtractionError::Inference(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    body
                )));
            }

            let generated: Vec<GeneratedText> = response
                .json()
                .map_err(|e| ExtractionError::InvalidFormat(e.to_string()))?;

            generated
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or_else(|| ExtractionError::InvalidFormat("empty generation list".into()))
        }
    }
}

/// Mock client for testing: returns a fixed reply or error and records prompts.
pub struct MockLlmClient {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A client whose every call fails with [`ExtractionError::Inference`].
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    fn model(&self) -> &str {
        "mock"
    }

    fn generate(&self, prompt: &str) -> ExtractionResult<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.reply.clone().map_err(ExtractionError::Inference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = InferenceConfig::default();
        assert_eq!(config.model, "ibm-granite/granite-3.3-2b-instruct");
        assert_eq!(config.max_new_tokens, 200);
        assert_eq!(
            config.model_url(),
            "https://api-inference.huggingface.co/models/ibm-granite/granite-3.3-2b-instruct"
        );
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_TOKEN, "hf_secret"),
            (ENV_MODEL, "org/other-model"),
            (ENV_ENDPOINT, "http://localhost:8080/"),
        ]
        .into_iter()
        .collect();

        let config = InferenceConfig::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.token.as_deref(), Some("hf_secret"));
        assert_eq!(config.model_url(), "http://localhost:8080/models/org/other-model");
    }

    #[test]
    fn test_blank_token_ignored() {
        let config = InferenceConfig::default()
            .with_overrides(|k| (k == ENV_TOKEN).then(|| "  ".to_string()));
        assert!(config.token.is_none());
    }

    #[test]
    fn test_token_not_leaked() {
        let config = InferenceConfig {
            token: Some("hf_secret".into()),
            ..InferenceConfig::default()
        };

        assert!(!format!("{:?}", config).contains("hf_secret"));
        assert!(!serde_json::to_string(&config).unwrap().contains("hf_secret"));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_client_requires_token() {
        let err = HuggingFaceClient::new(InferenceConfig::default()).err().unwrap();
        assert!(matches!(err, ExtractionError::Unavailable(_)));
    }

    #[test]
    fn test_mock_client() {
        let client = MockLlmClient::new("{}");
        assert_eq!(client.generate("hello").unwrap(), "{}");
        assert_eq!(client.prompts(), vec!["hello"]);

        let failing = MockLlmClient::failing("boom");
        assert!(failing.generate("hello").is_err());
    }
}
