use std::path::PathBuf;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::recovery::Extraction;
use crate::{RecipeClient, RecipeError};

/// Builder for configuring a [`RecipeClient`]
///
/// Every setting left unset keeps the value of the base configuration, which
/// is [`ClientConfig::default`] unless [`RecipeClientBuilder::config`] is used.
#[derive(Debug, Default)]
pub struct RecipeClientBuilder {
    config: Option<ClientConfig>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
    extraction: Option<Extraction>,
    parse_retries: Option<u32>,
    output_dir: Option<PathBuf>,
}

impl RecipeClientBuilder {
    /// Start from a loaded configuration
    ///
    /// # Example
    /// ```no_run
    /// use recipe_snap::{ClientConfig, RecipeClient};
    ///
    /// let config = ClientConfig::load()?;
    /// let client = RecipeClient::builder().config(config).build()?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the API key for the completion endpoint
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Point the client at another OpenAI-compatible endpoint
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the model name
    ///
    /// # Example
    /// ```
    /// use recipe_snap::RecipeClient;
    ///
    /// let builder = RecipeClient::builder()
    ///     .api_key("your-api-key")
    ///     .model("llama-3.2-90b-vision-preview");
    /// ```
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set a timeout for HTTP requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Choose how JSON is located in model replies
    pub fn extraction(mut self, extraction: Extraction) -> Self {
        self.extraction = Some(extraction);
        self
    }

    /// Re-prompt once after a malformed reply
    pub fn retry_on_malformed(mut self) -> Self {
        self.parse_retries = Some(1);
        self
    }

    /// Directory rendered documents are written to
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Merge the overrides into the base configuration
    pub fn into_config(self) -> ClientConfig {
        let mut config = self.config.unwrap_or_default();

        if let Some(api_key) = self.api_key {
            config.api_key = Some(api_key);
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout.as_secs().max(1);
        }
        if let Some(extraction) = self.extraction {
            config.recovery.extraction = extraction;
        }
        if let Some(parse_retries) = self.parse_retries {
            config.recovery.parse_retries = parse_retries;
        }
        if let Some(output_dir) = self.output_dir {
            config.export.output_dir = Some(output_dir);
        }

        config
    }

    /// Build the client
    ///
    /// # Errors
    /// Returns `RecipeError::MissingApiKey` when no key is configured and
    /// GROQ_API_KEY is unset.
    pub fn build(self) -> Result<RecipeClient, RecipeError> {
        RecipeClient::new(self.into_config())
    }
}
