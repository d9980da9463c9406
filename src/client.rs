use std::path::Path;

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::RecipeError;
use crate::model::{FullRecipe, IngredientScanResult, RecipeSelection};
use crate::platform::guess_mime_type;
use crate::providers::{
    build_recipe_request, build_scan_request, ChatCompletionsProvider, CompletionProvider,
    CompletionRequest,
};
use crate::recovery::{self, Extraction};

/// Client for the two recipe-generation operations.
///
/// Stateless between calls: concurrent calls are neither deduplicated nor
/// serialized, callers that care must cancel or serialize themselves.
pub struct RecipeClient {
    provider: Box<dyn CompletionProvider>,
    config: ClientConfig,
}

impl RecipeClient {
    /// Create a client backed by the HTTP completion endpoint
    pub fn new(config: ClientConfig) -> Result<Self, RecipeError> {
        let provider = ChatCompletionsProvider::new(&config)?;
        Ok(Self::with_provider(Box::new(provider), config))
    }

    /// Create a client around any provider, e.g. a test double
    pub fn with_provider(provider: Box<dyn CompletionProvider>, config: ClientConfig) -> Self {
        RecipeClient { provider, config }
    }

    pub fn builder() -> crate::builder::RecipeClientBuilder {
        crate::builder::RecipeClientBuilder::default()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Detect ingredients in a photo and propose recipes
    pub async fn scan_ingredients(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<IngredientScanResult, RecipeError> {
        self.scan_ingredients_with_cancel(image, mime_type, &CancellationToken::new())
            .await
    }

    pub async fn scan_ingredients_with_cancel(
        &self,
        image: &[u8],
        mime_type: &str,
        cancel: &CancellationToken,
    ) -> Result<IngredientScanResult, RecipeError> {
        if image.is_empty() {
            return Err(RecipeError::InvalidInput(
                "Image data cannot be empty".to_string(),
            ));
        }

        let request = build_scan_request(
            image,
            mime_type,
            self.config.scan_max_tokens,
            self.config.temperature,
        );
        let scan: IngredientScanResult = self.complete_json(&request, cancel).await?;
        let scan = scan.with_positional_ids();

        info!(
            "Scan found {} ingredient(s) and {} recipe idea(s)",
            scan.ingredients.len(),
            scan.recipe_summaries.len()
        );
        Ok(scan)
    }

    /// Read an image from disk and scan it
    pub async fn scan_image_file(&self, path: &Path) -> Result<IngredientScanResult, RecipeError> {
        let image = tokio::fs::read(path).await.map_err(|e| {
            RecipeError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.scan_ingredients(&image, guess_mime_type(path)).await
    }

    /// Ask for the complete recipe behind a summary title
    pub async fn fetch_full_recipe(
        &self,
        title: &str,
        ingredients: &[String],
    ) -> Result<FullRecipe, RecipeError> {
        self.fetch_full_recipe_with_cancel(title, ingredients, &CancellationToken::new())
            .await
    }

    pub async fn fetch_full_recipe_with_cancel(
        &self,
        title: &str,
        ingredients: &[String],
        cancel: &CancellationToken,
    ) -> Result<FullRecipe, RecipeError> {
        if title.trim().is_empty() {
            return Err(RecipeError::InvalidInput(
                "Recipe title cannot be empty".to_string(),
            ));
        }

        let request = build_recipe_request(
            title,
            ingredients,
            self.config.recipe_max_tokens,
            self.config.temperature,
        );
        let recipe: FullRecipe = self.complete_json(&request, cancel).await?;

        info!(
            "Fetched '{}' with {} step(s)",
            recipe.title,
            recipe.steps.len()
        );
        Ok(recipe)
    }

    /// Fetch the full recipe for a summary picked from a scan
    pub async fn fetch_selection(
        &self,
        selection: &RecipeSelection,
    ) -> Result<FullRecipe, RecipeError> {
        self.fetch_full_recipe(&selection.summary.title, &selection.ingredients)
            .await
    }

    async fn complete_json<T: DeserializeOwned>(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<T, RecipeError> {
        let extraction: Extraction = self.config.recovery.extraction;
        let retries = self.config.parse_retries();
        let mut attempt = 0;

        loop {
            let text = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RecipeError::Cancelled),
                reply = self.provider.complete(request) => reply?,
            };
            debug!("Reply from {}: {} characters", self.provider.provider_name(), text.len());

            match recovery::recover::<T>(&text, extraction) {
                Err(e) if e.is_retryable_parse_failure() && attempt < retries => {
                    attempt += 1;
                    warn!("Could not recover JSON from reply, re-prompting ({attempt}/{retries})");
                }
                result => return result,
            }
        }
    }
}
