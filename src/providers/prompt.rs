use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{ChatMessage, CompletionRequest, ContentPart, ImageUrl, MessageContent};

/// Instruction sent alongside the photo.
///
/// Asks for a strict JSON object with `ingredients` and exactly six `recipes`.
pub const SCAN_PROMPT: &str = include_str!("prompts/scan.txt");

/// Full-recipe instruction template.
///
/// Contains `{{TITLE}}` and `{{INGREDIENTS}}` placeholders that are replaced
/// by [`build_recipe_request`].
pub const RECIPE_PROMPT_TEMPLATE: &str = include_str!("prompts/recipe.txt");

/// Encode image bytes as a `data:` URI
pub fn image_data_uri(image: &[u8], mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(image))
}

/// Single user message: the image first, then the instruction
pub fn build_scan_request(
    image: &[u8],
    mime_type: &str,
    max_tokens: u32,
    temperature: f32,
) -> CompletionRequest {
    let parts = vec![
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: image_data_uri(image, mime_type),
            },
        },
        ContentPart::Text {
            text: SCAN_PROMPT.trim().to_string(),
        },
    ];

    CompletionRequest {
        messages: vec![ChatMessage::user(MessageContent::Parts(parts))],
        max_tokens,
        temperature,
    }
}

pub fn build_recipe_request(
    title: &str,
    ingredients: &[String],
    max_tokens: u32,
    temperature: f32,
) -> CompletionRequest {
    let prompt = RECIPE_PROMPT_TEMPLATE
        .trim()
        .replace("{{TITLE}}", title.trim())
        .replace("{{INGREDIENTS}}", &ingredients.join(", "));

    CompletionRequest {
        messages: vec![ChatMessage::user(MessageContent::Text(prompt))],
        max_tokens,
        temperature,
    }
}
