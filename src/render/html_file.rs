use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;
use tokio::fs;
use uuid::Uuid;

use super::{DocumentBackend, DocumentHandle, HTML_MIME_TYPE};
use crate::error::RecipeError;

/// Writes the markup as an `.html` file
pub struct HtmlFileBackend {
    output_dir: PathBuf,
}

impl HtmlFileBackend {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        HtmlFileBackend {
            output_dir: output_dir.into(),
        }
    }
}

/// Lowercase, ASCII alphanumerics joined by single dashes
fn slugify(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "recipe".to_string()
    } else {
        slug
    }
}

#[async_trait]
impl DocumentBackend for HtmlFileBackend {
    async fn print(&self, html: &str, name: &str) -> Result<DocumentHandle, RecipeError> {
        fs::create_dir_all(&self.output_dir).await?;

        let id = Uuid::new_v4().simple().to_string();
        let file_name = format!("{}-{}.html", slugify(name), &id[..8]);
        let path = self.output_dir.join(file_name);

        fs::write(&path, html).await?;
        debug!("Wrote {} bytes to {}", html.len(), path.display());

        Ok(DocumentHandle {
            path,
            mime_type: HTML_MIME_TYPE.to_string(),
        })
    }
}
