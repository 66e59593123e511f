//! Configuration for the Gemini engine.

use campaign_core::EngineError;
use std::env;

/// Default REST endpoint.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default text and chat model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default image model.
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

/// Configuration for GeminiEngine.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Gemini REST base URL.
    pub api_url: String,

    /// API key sent as the `key` query parameter.
    pub api_key: String,

    /// Model used for text, JSON, and chat.
    pub model: String,

    /// Model used for image generation.
    pub image_model: String,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            temperature: None,
            timeout_secs: 60,
        }
    }
}

impl GeminiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GEMINI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `GEMINI_API_URL` - API URL (default: the public v1beta endpoint)
    /// - `GEMINI_MODEL` - Model name (default: gemini-2.5-flash)
    /// - `GEMINI_IMAGE_MODEL` - Image model (default: imagen-4.0-generate-001)
    /// - `GEMINI_TEMPERATURE` - Temperature (default: model default)
    /// - `GEMINI_TIMEOUT_SECS` - Request timeout (default: 60)
    pub fn from_env() -> Result<Self, EngineError> {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| EngineError::Configuration("GEMINI_API_KEY not set".to_string()))?;

        let api_url = env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let image_model =
            env::var("GEMINI_IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string());

        let temperature = env::var("GEMINI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok());

        let timeout_secs = env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Ok(Self {
            api_url,
            api_key,
            model,
            image_model,
            temperature,
            timeout_secs,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }

    pub(crate) fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.api_url.trim_end_matches('/'),
            model,
            self.api_key
        )
    }

    pub(crate) fn predict_url(&self) -> String {
        format!(
            "{}/models/{}:predict?key={}",
            self.api_url.trim_end_matches('/'),
            self.image_model,
            self.api_key
        )
    }
}

/// Builder for GeminiConfig.
#[derive(Debug, Default)]
pub struct GeminiConfigBuilder {
    config: GeminiConfig,
}

impl GeminiConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the image model name.
    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.config.image_model = model.into();
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the request timeout.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GeminiConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.image_model, "imagen-4.0-generate-001");
        assert!(config.temperature.is_none());
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_builder_all_options() {
        let config = GeminiConfig::builder()
            .api_key("my-key")
            .api_url("https://custom.api.com/v1/")
            .model("gemini-pro")
            .image_model("imagen-3")
            .temperature(0.4)
            .timeout_secs(10)
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.temperature, Some(0.4));
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(
            config.generate_url("gemini-pro"),
            "https://custom.api.com/v1/models/gemini-pro:generateContent?key=my-key"
        );
        assert_eq!(
            config.predict_url(),
            "https://custom.api.com/v1/models/imagen-3:predict?key=my-key"
        );
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_gemini_vars() {
            for key in [
                "GEMINI_API_KEY",
                "GEMINI_API_URL",
                "GEMINI_MODEL",
                "GEMINI_IMAGE_MODEL",
                "GEMINI_TEMPERATURE",
                "GEMINI_TIMEOUT_SECS",
            ] {
                std::env::remove_var(key);
            }
        }

        // Missing API key should error
        clear_all_gemini_vars();
        match GeminiConfig::from_env() {
            Err(EngineError::Configuration(msg)) => assert!(msg.contains("GEMINI_API_KEY")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }

        // Only API key set, defaults used
        std::env::set_var("GEMINI_API_KEY", "test-env-key");
        let config = GeminiConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout_secs, 60);

        // All vars set
        std::env::set_var("GEMINI_MODEL", "gemini-exp");
        std::env::set_var("GEMINI_IMAGE_MODEL", "imagen-exp");
        std::env::set_var("GEMINI_TEMPERATURE", "0.9");
        std::env::set_var("GEMINI_TIMEOUT_SECS", "5");
        let config = GeminiConfig::from_env().unwrap();
        assert_eq!(config.model, "gemini-exp");
        assert_eq!(config.image_model, "imagen-exp");
        assert_eq!(config.temperature, Some(0.9));
        assert_eq!(config.timeout_secs, 5);

        clear_all_gemini_vars();
    }
}
