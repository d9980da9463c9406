//! UniFFI bindings for recipe-snap
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! It wraps the async Rust API with synchronous functions that manage their own tokio runtime.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::model::{
    Difficulty, FullRecipe, IngredientLine, IngredientScanResult, Nutrition, RecipeSummary, Step,
};
use crate::render::{render_html, DocumentRenderer, HtmlFileBackend};
use crate::{ClientConfig, RecipeClient, RecipeError};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible recipe summary
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipeSummary {
    pub id: String,
    pub title: String,
    pub emoji: String,
    /// Difficulty label as shown to the user
    pub difficulty: String,
    /// Badge text colour for the difficulty
    pub difficulty_color: String,
    pub time: String,
    pub description: String,
}

impl From<RecipeSummary> for FfiRecipeSummary {
    fn from(summary: RecipeSummary) -> Self {
        FfiRecipeSummary {
            difficulty_color: summary.difficulty.palette().text.to_string(),
            difficulty: summary.difficulty.label().to_string(),
            id: summary.id,
            title: summary.title,
            emoji: summary.emoji,
            time: summary.time,
            description: summary.description,
        }
    }
}

impl From<FfiRecipeSummary> for RecipeSummary {
    fn from(ffi: FfiRecipeSummary) -> Self {
        RecipeSummary {
            id: ffi.id,
            title: ffi.title,
            emoji: ffi.emoji,
            difficulty: Difficulty::parse(&ffi.difficulty),
            time: ffi.time,
            description: ffi.description,
        }
    }
}

/// FFI-compatible scan result
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiScanResult {
    pub ingredients: Vec<String>,
    pub recipe_summaries: Vec<FfiRecipeSummary>,
}

impl From<IngredientScanResult> for FfiScanResult {
    fn from(scan: IngredientScanResult) -> Self {
        FfiScanResult {
            ingredients: scan.ingredients,
            recipe_summaries: scan.recipe_summaries.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiIngredientLine {
    pub amount: String,
    pub unit: String,
    pub item: String,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiStep {
    pub number: Option<u32>,
    pub instruction: String,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiNutrition {
    pub calories: Option<f64>,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
}

/// FFI-compatible full recipe
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiFullRecipe {
    pub title: String,
    pub emoji: String,
    pub description: String,
    /// Missing or zero servings are reported as 2
    pub servings: u32,
    pub prep_time: String,
    pub cook_time: String,
    pub difficulty: String,
    pub ingredient_lines: Vec<FfiIngredientLine>,
    pub steps: Vec<FfiStep>,
    pub tips: Vec<String>,
    pub nutrition: Option<FfiNutrition>,
}

impl From<FullRecipe> for FfiFullRecipe {
    fn from(recipe: FullRecipe) -> Self {
        FfiFullRecipe {
            servings: recipe.servings_or_default(),
            difficulty: recipe.difficulty.label().to_string(),
            title: recipe.title,
            emoji: recipe.emoji,
            description: recipe.description,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            ingredient_lines: recipe
                .ingredient_lines
                .into_iter()
                .map(|line| FfiIngredientLine {
                    amount: line.amount,
                    unit: line.unit,
                    item: line.item,
                })
                .collect(),
            steps: recipe
                .steps
                .into_iter()
                .map(|step| FfiStep {
                    number: step.number,
                    instruction: step.instruction,
                })
                .collect(),
            tips: recipe.tips,
            nutrition: recipe.nutrition.map(|n| FfiNutrition {
                calories: n.calories,
                protein: n.protein,
                carbs: n.carbs,
                fat: n.fat,
            }),
        }
    }
}

impl From<FfiFullRecipe> for FullRecipe {
    fn from(ffi: FfiFullRecipe) -> Self {
        FullRecipe {
            title: ffi.title,
            emoji: ffi.emoji,
            description: ffi.description,
            servings: Some(ffi.servings),
            prep_time: ffi.prep_time,
            cook_time: ffi.cook_time,
            difficulty: Difficulty::parse(&ffi.difficulty),
            ingredient_lines: ffi
                .ingredient_lines
                .into_iter()
                .map(|line| IngredientLine {
                    amount: line.amount,
                    unit: line.unit,
                    item: line.item,
                })
                .collect(),
            steps: ffi
                .steps
                .into_iter()
                .map(|step| Step {
                    number: step.number,
                    instruction: step.instruction,
                })
                .collect(),
            tips: ffi.tips,
            nutrition: ffi.nutrition.map(|n| Nutrition {
                calories: n.calories,
                protein: n.protein,
                carbs: n.carbs,
                fat: n.fat,
            }),
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiRecipeError {
    /// Transport, HTTP or API error from the completion endpoint
    Upstream { message: String },
    /// The endpoint returned no text
    EmptyResponse { message: String },
    /// No JSON could be recovered from the reply
    MalformedResponse { message: String },
    /// The request was cancelled
    Cancelled { message: String },
    /// Document rendering failed
    Render { message: String },
    /// Invalid input provided
    InvalidInput { message: String },
    /// Configuration error
    ConfigError { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiRecipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiRecipeError::Upstream { message }
            | FfiRecipeError::EmptyResponse { message }
            | FfiRecipeError::MalformedResponse { message }
            | FfiRecipeError::Cancelled { message } => write!(f, "{}", message),
            FfiRecipeError::Render { message } => write!(f, "Render error: {}", message),
            FfiRecipeError::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            FfiRecipeError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiRecipeError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiRecipeError {}

impl From<RecipeError> for FfiRecipeError {
    fn from(err: RecipeError) -> Self {
        let message = err.to_string();
        match err {
            RecipeError::Upstream { .. } => FfiRecipeError::Upstream { message },
            RecipeError::EmptyResponse => FfiRecipeError::EmptyResponse { message },
            RecipeError::MalformedResponse { .. } => FfiRecipeError::MalformedResponse { message },
            RecipeError::Cancelled => FfiRecipeError::Cancelled { message },
            RecipeError::Render(msg) => FfiRecipeError::Render { message: msg },
            RecipeError::InvalidInput(msg) => FfiRecipeError::InvalidInput { message: msg },
            RecipeError::MissingApiKey | RecipeError::Config(_) => {
                FfiRecipeError::ConfigError { message }
            }
        }
    }
}

/// Configuration passed from the app
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiClientConfig {
    /// Optional API key (uses GROQ_API_KEY if not specified)
    pub api_key: Option<String>,
    /// Optional model name
    pub model: Option<String>,
    /// Optional base URL of an OpenAI-compatible endpoint
    pub base_url: Option<String>,
    /// Optional timeout in seconds (uses default if not specified)
    pub timeout_seconds: Option<u64>,
    /// Re-prompt once when the reply cannot be parsed
    pub retry_on_malformed: bool,
}

impl FfiClientConfig {
    fn into_client(self) -> Result<RecipeClient, RecipeError> {
        let mut builder = RecipeClient::builder();

        if let Some(api_key) = self.api_key {
            builder = builder.api_key(api_key);
        }
        if let Some(model) = self.model {
            builder = builder.model(model);
        }
        if let Some(base_url) = self.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(timeout_secs) = self.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        if self.retry_on_malformed {
            builder = builder.retry_on_malformed();
        }

        builder.build()
    }
}

/// Lets the app abort an in-flight call from another thread
#[derive(Debug, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Object))]
pub struct FfiCancelHandle {
    token: CancellationToken,
}

#[cfg_attr(feature = "uniffi", uniffi::export)]
impl FfiCancelHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Create a handle to pass to a cancellable call
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn new_cancel_handle() -> Arc<FfiCancelHandle> {
    Arc::new(FfiCancelHandle::default())
}

fn token_for(cancel: Option<Arc<FfiCancelHandle>>) -> CancellationToken {
    cancel
        .map(|handle| handle.token.clone())
        .unwrap_or_default()
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiRecipeError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiRecipeError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

/// Detect ingredients in a photo and propose recipes
///
/// # Arguments
/// * `image` - Encoded JPEG/PNG bytes
/// * `mime_type` - MIME type of `image`
/// * `config` - Optional configuration
/// * `cancel` - Optional handle to abort the request
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn scan_ingredients(
    image: Vec<u8>,
    mime_type: String,
    config: Option<FfiClientConfig>,
    cancel: Option<Arc<FfiCancelHandle>>,
) -> Result<FfiScanResult, FfiRecipeError> {
    let rt = create_runtime()?;
    let token = token_for(cancel);
    rt.block_on(async {
        let client = config.unwrap_or_default().into_client()?;
        let scan = client
            .scan_ingredients_with_cancel(&image, &mime_type, &token)
            .await?;
        Ok(scan.into())
    })
}

/// Fetch the complete recipe for a title picked from a scan
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn fetch_full_recipe(
    title: String,
    ingredients: Vec<String>,
    config: Option<FfiClientConfig>,
    cancel: Option<Arc<FfiCancelHandle>>,
) -> Result<FfiFullRecipe, FfiRecipeError> {
    let rt = create_runtime()?;
    let token = token_for(cancel);
    rt.block_on(async {
        let client = config.unwrap_or_default().into_client()?;
        let recipe = client
            .fetch_full_recipe_with_cancel(&title, &ingredients, &token)
            .await?;
        Ok(recipe.into())
    })
}

/// Render a recipe as a self-contained HTML document for the platform printer
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn render_recipe_html(recipe: FfiFullRecipe) -> String {
    render_html(&recipe.into(), &ClientConfig::default().export.footer)
}

/// Render a recipe into `output_dir` and return the file path
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn render_recipe_to_file(
    recipe: FfiFullRecipe,
    output_dir: String,
) -> Result<String, FfiRecipeError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let renderer = DocumentRenderer::new(
            Box::new(HtmlFileBackend::new(PathBuf::from(output_dir))),
            ClientConfig::default().export.footer,
        );
        let handle = renderer.render(&recipe.into()).await?;
        Ok(handle.path.to_string_lossy().into_owned())
    })
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recipe() -> FullRecipe {
        FullRecipe {
            title: "Omelette".to_string(),
            servings: None,
            difficulty: Difficulty::Other("Tricky".to_string()),
            steps: vec![Step {
                number: Some(1),
                instruction: "Whisk eggs.".to_string(),
            }],
            nutrition: Some(Nutrition {
                calories: Some(210.0),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_ffi_recipe_conversion() {
        let ffi: FfiFullRecipe = sample_recipe().into();
        assert_eq!(ffi.title, "Omelette");
        assert_eq!(ffi.servings, 2);
        assert_eq!(ffi.difficulty, "Tricky");
        assert_eq!(ffi.steps.len(), 1);
        assert_eq!(ffi.nutrition.as_ref().unwrap().calories, Some(210.0));

        let back: FullRecipe = ffi.into();
        assert_eq!(back.title, "Omelette");
        assert_eq!(back.difficulty, Difficulty::Other("Tricky".to_string()));
        assert_eq!(back.steps[0].instruction, "Whisk eggs.");
    }

    #[test]
    fn test_ffi_summary_carries_badge_colour() {
        let summary = RecipeSummary {
            title: "Soup".to_string(),
            difficulty: Difficulty::Hard,
            ..Default::default()
        };
        let ffi: FfiRecipeSummary = summary.into();
        assert_eq!(ffi.difficulty, "Hard");
        assert_eq!(ffi.difficulty_color, "#E74C3C");
    }

    #[test]
    fn test_error_mapping_keeps_user_message() {
        let ffi: FfiRecipeError = RecipeError::MalformedResponse {
            detail: "eof".to_string(),
        }
        .into();
        assert_eq!(ffi.to_string(), "Could not parse response. Please try again.");

        let ffi: FfiRecipeError = RecipeError::MissingApiKey.into();
        assert!(matches!(ffi, FfiRecipeError::ConfigError { .. }));
    }

    #[test]
    fn test_cancel_handle() {
        let handle = new_cancel_handle();
        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(token_for(Some(handle)).is_cancelled());
        assert!(!token_for(None).is_cancelled());
    }

    #[test]
    fn test_scan_rejects_empty_image() {
        let config = FfiClientConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let result = scan_ingredients(Vec::new(), "image/jpeg".to_string(), Some(config), None);
        assert!(matches!(result, Err(FfiRecipeError::InvalidInput { .. })));
    }

    #[test]
    fn test_render_recipe_html() {
        let html = render_recipe_html(sample_recipe().into());
        assert!(html.contains("Omelette"));
        assert!(html.contains("Recipe AI"));
    }

    #[test]
    fn test_get_version() {
        assert!(!get_version().is_empty());
    }
}
