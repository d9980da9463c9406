//! Seams for the device: camera/gallery access and the share sheet.
//!
//! Each prompt resolves to an explicit outcome. Denied permissions,
//! cancelled captures and a missing share facility are outcomes, not errors.

use std::path::Path;

use async_trait::async_trait;
use log::{info, warn};

use crate::error::RecipeError;
use crate::model::FullRecipe;
use crate::render::{DocumentHandle, DocumentRenderer, HTML_MIME_TYPE, PDF_MIME_TYPE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSourceKind {
    Camera,
    Gallery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    /// URI the UI can use to preview the photo
    pub display_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured(CapturedImage),
    Cancelled,
}

#[async_trait]
pub trait ImagePicker: Send + Sync {
    async fn request_permission(&self, source: ImageSourceKind) -> PermissionStatus;
    async fn capture(&self, source: ImageSourceKind) -> Result<CaptureOutcome, RecipeError>;
}

/// Ask for permission, then capture. `None` means no image is available.
pub async fn acquire_image(
    picker: &dyn ImagePicker,
    source: ImageSourceKind,
) -> Result<Option<CapturedImage>, RecipeError> {
    if picker.request_permission(source).await == PermissionStatus::Denied {
        info!("{:?} permission denied", source);
        return Ok(None);
    }

    match picker.capture(source).await? {
        CaptureOutcome::Captured(image) if !image.bytes.is_empty() => Ok(Some(image)),
        CaptureOutcome::Captured(_) | CaptureOutcome::Cancelled => Ok(None),
    }
}

/// What the share sheet is asked to present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub mime_type: String,
    pub dialog_title: String,
    /// iOS uniform type identifier
    pub uti: String,
}

impl ShareRequest {
    /// Describe `document` as it actually is on disk
    pub fn for_document(document: &DocumentHandle, title: &str) -> Self {
        ShareRequest {
            mime_type: document.mime_type.clone(),
            dialog_title: format!("Share {} Recipe", title.trim()),
            uti: uniform_type_identifier(&document.mime_type).to_string(),
        }
    }
}

fn uniform_type_identifier(mime_type: &str) -> &'static str {
    match mime_type {
        PDF_MIME_TYPE => "com.adobe.pdf",
        HTML_MIME_TYPE => "public.html",
        _ => "public.data",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Unavailable,
}

#[async_trait]
pub trait ShareSheet: Send + Sync {
    async fn is_available(&self) -> bool;
    async fn share(
        &self,
        document: &DocumentHandle,
        request: &ShareRequest,
    ) -> Result<(), RecipeError>;
}

pub async fn share_document(
    sheet: &dyn ShareSheet,
    document: &DocumentHandle,
    title: &str,
) -> Result<ShareOutcome, RecipeError> {
    if !sheet.is_available().await {
        warn!("Sharing is not available on this platform");
        return Ok(ShareOutcome::Unavailable);
    }

    sheet
        .share(document, &ShareRequest::for_document(document, title))
        .await?;
    Ok(ShareOutcome::Shared)
}

/// Render the recipe and offer it for sharing; the handle is returned either way
pub async fn export_recipe(
    renderer: &DocumentRenderer,
    sheet: &dyn ShareSheet,
    recipe: &FullRecipe,
) -> Result<DocumentHandle, RecipeError> {
    let document = renderer.render(recipe).await?;
    share_document(sheet, &document, &recipe.title).await?;
    Ok(document)
}

/// MIME type from a file extension, JPEG when unknown
pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}
