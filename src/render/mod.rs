//! Static export document for a [`FullRecipe`].
//!
//! The markup is self-contained (styles inlined) so a platform print
//! facility can turn it into a PDF without network access.

mod html_file;

pub use html_file::HtmlFileBackend;

use std::fmt::Write as _;
use std::path::PathBuf;

use async_trait::async_trait;
use html_escape::encode_text;
use log::info;

use crate::config::ClientConfig;
use crate::error::RecipeError;
use crate::model::{FullRecipe, Nutrition};

const STYLE: &str = include_str!("style.css");
const PLACEHOLDER: &str = "—";
const UNTITLED: &str = "Untitled Recipe";

/// MIME type of documents printed to PDF by a platform backend
pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const HTML_MIME_TYPE: &str = "text/html";

/// Where a rendered document ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    pub path: PathBuf,
    pub mime_type: String,
}

impl DocumentHandle {
    /// `file://` URI for platform share APIs
    pub fn uri(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

/// Turns markup into a stored document (HTML file, printed PDF, ...)
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    async fn print(&self, html: &str, name: &str) -> Result<DocumentHandle, RecipeError>;
}

pub struct DocumentRenderer {
    backend: Box<dyn DocumentBackend>,
    footer: String,
}

impl DocumentRenderer {
    pub fn new(backend: Box<dyn DocumentBackend>, footer: impl Into<String>) -> Self {
        DocumentRenderer {
            backend,
            footer: footer.into(),
        }
    }

    /// HTML files in the configured output directory
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            Box::new(HtmlFileBackend::new(config.output_dir())),
            config.export.footer.clone(),
        )
    }

    pub fn html(&self, recipe: &FullRecipe) -> String {
        render_html(recipe, &self.footer)
    }

    /// Render the recipe and hand it to the backend
    pub async fn render(&self, recipe: &FullRecipe) -> Result<DocumentHandle, RecipeError> {
        let html = self.html(recipe);
        let handle = self.backend.print(&html, display_title(recipe)).await?;
        info!("Rendered '{}' to {}", display_title(recipe), handle.path.display());
        Ok(handle)
    }
}

fn display_title(recipe: &FullRecipe) -> &str {
    let title = recipe.title.trim();
    if title.is_empty() {
        UNTITLED
    } else {
        title
    }
}

fn or_placeholder(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        PLACEHOLDER
    } else {
        trimmed
    }
}

fn format_calories(calories: Option<f64>) -> String {
    match calories {
        Some(value) if value.fract() == 0.0 => format!("{}", value as i64),
        Some(value) => format!("{:.1}", value),
        None => PLACEHOLDER.to_string(),
    }
}

/// Render the full document. Infallible: every missing field has a placeholder.
pub fn render_html(recipe: &FullRecipe, footer: &str) -> String {
    let title = encode_text(display_title(recipe));
    let level = recipe.difficulty.label();
    let level = if level.trim().is_empty() { "Medium" } else { level };
    let palette = recipe.difficulty.palette();

    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title>\n<style>\n{STYLE}</style></head><body>\n"
    );

    let _ = write!(
        html,
        "\n<div class=\"header\">\n  <span class=\"emoji\">{}</span>\n  <div class=\"title\">{title}</div>\n  <div class=\"desc\">{}</div>\n</div>\n",
        encode_text(recipe.emoji.trim()),
        encode_text(recipe.description.trim()),
    );

    let _ = write!(
        html,
        "\n<div class=\"meta\">\n  {}\n  {}\n  {}\n  <div class=\"meta-item\"><div class=\"meta-label\">Level</div><div class=\"meta-value\" style=\"color:{}\">{}</div></div>\n</div>\n",
        meta_item("Prep", &recipe.prep_time),
        meta_item("Cook", &recipe.cook_time),
        meta_item("Serves", &recipe.servings_or_default().to_string()),
        palette.text,
        encode_text(level),
    );

    html.push_str("\n<div class=\"section\">\n  <div class=\"section-title\">Ingredients</div>\n  <ul class=\"ing-list\">");
    for line in &recipe.ingredient_lines {
        let amount = format!("{} {}", line.amount.trim(), line.unit.trim());
        let _ = write!(
            html,
            "<li><span class=\"amt\">{}</span> {}</li>",
            encode_text(amount.trim()),
            encode_text(or_placeholder(&line.item)),
        );
    }
    html.push_str("</ul>\n</div>\n");

    html.push_str("\n<div class=\"section\">\n  <div class=\"section-title\">Instructions</div>\n");
    for (position, step) in recipe.steps.iter().enumerate() {
        let number = step.number.unwrap_or(position as u32 + 1);
        let _ = write!(
            html,
            "  <div class=\"step\">\n    <div class=\"step-num\">{}</div>\n    <div class=\"step-text\">{}</div>\n  </div>\n",
            number,
            encode_text(or_placeholder(&step.instruction)),
        );
    }
    html.push_str("</div>\n");

    let tips: Vec<&str> = recipe
        .tips
        .iter()
        .map(|tip| tip.trim())
        .filter(|tip| !tip.is_empty())
        .collect();
    if !tips.is_empty() {
        html.push_str("\n<div class=\"tips-box\"><div class=\"tips-title\">Chef's Tips</div><ul class=\"tips-list\">");
        for tip in tips {
            let _ = write!(html, "<li>{}</li>", encode_text(tip));
        }
        html.push_str("</ul></div>\n");
    }

    if let Some(nutrition) = &recipe.nutrition {
        html.push_str(&nutrition_block(nutrition));
    }

    let _ = write!(
        html,
        "\n<div class=\"footer\">{}</div>\n</body></html>",
        encode_text(footer)
    );
    html
}

fn meta_item(label: &str, value: &str) -> String {
    format!(
        "<div class=\"meta-item\"><div class=\"meta-label\">{}</div><div class=\"meta-value\">{}</div></div>",
        label,
        encode_text(or_placeholder(value)),
    )
}

fn nutrition_block(nutrition: &Nutrition) -> String {
    let cards = [
        (format_calories(nutrition.calories), "Calories"),
        (or_placeholder(&nutrition.protein).to_string(), "Protein"),
        (or_placeholder(&nutrition.carbs).to_string(), "Carbs"),
        (or_placeholder(&nutrition.fat).to_string(), "Fat"),
    ];

    let mut block = String::from(
        "\n<div class=\"section nutrition\">\n  <div class=\"section-title\">Nutrition per serving</div>\n  <div class=\"nut-grid\">\n",
    );
    for (value, label) in cards {
        let _ = writeln!(
            block,
            "    <div class=\"nut-card\"><span class=\"nut-val\">{}</span><span class=\"nut-lbl\">{}</span></div>",
            encode_text(&value),
            label,
        );
    }
    block.push_str("  </div>\n</div>\n");
    block
}
