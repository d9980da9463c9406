pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod platform;
pub mod providers;
pub mod recovery;
pub mod render;

// UniFFI bindings for iOS and Android
pub mod uniffi_bindings;

pub use builder::RecipeClientBuilder;
pub use client::RecipeClient;
pub use config::ClientConfig;
pub use error::RecipeError;
pub use model::{
    Difficulty, FullRecipe, IngredientLine, IngredientScanResult, Nutrition, RecipeSelection,
    RecipeSummary, Step,
};
pub use recovery::Extraction;
pub use render::{render_html, DocumentHandle, DocumentRenderer};
pub use tokio_util::sync::CancellationToken;

/// Scan a photo using configuration from `recipe_snap.toml` and the environment
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let photo = std::fs::read("fridge.jpg")?;
/// let scan = recipe_snap::scan_ingredients(&photo, "image/jpeg").await?;
/// for recipe in &scan.recipe_summaries {
///     println!("{} {}", recipe.emoji, recipe.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn scan_ingredients(
    image: &[u8],
    mime_type: &str,
) -> Result<IngredientScanResult, RecipeError> {
    let client = RecipeClient::new(ClientConfig::load()?)?;
    client.scan_ingredients(image, mime_type).await
}

/// Fetch a full recipe using configuration from `recipe_snap.toml` and the environment
pub async fn fetch_full_recipe(
    title: &str,
    ingredients: &[String],
) -> Result<FullRecipe, RecipeError> {
    let client = RecipeClient::new(ClientConfig::load()?)?;
    client.fetch_full_recipe(title, ingredients).await
}

/// Render a recipe into the configured output directory
pub async fn render_recipe(recipe: &FullRecipe) -> Result<DocumentHandle, RecipeError> {
    let config = ClientConfig::load()?;
    DocumentRenderer::from_config(&config).render(recipe).await
}
