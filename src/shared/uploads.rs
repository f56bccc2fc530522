//! Multipart submission parsing shared by report, news and avatar uploads.
//!
//! Image limits are enforced while the body is read, so an oversized or
//! over-count submission fails before any database or storage call.

use std::collections::HashMap;

use axum::extract::Multipart;
use tracing::debug;

use crate::core::error::AppError;
use crate::shared::constants::{MAX_IMAGES_PER_SUBMISSION, MAX_IMAGE_SIZE};

/// An image received in a multipart body
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ImageUpload {
    /// File extension used for the stored object key
    pub fn extension(&self) -> String {
        if let Some(ext) = get_extension_from_content_type(&self.content_type) {
            return ext.to_string();
        }

        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "bin".to_string())
    }
}

/// Get file extension from an image content type
pub fn get_extension_from_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "image/bmp" => Some("bmp"),
        _ => None,
    }
}

pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.starts_with("image/")
}

/// Checks a single image against the type and size limits
pub fn validate_image(image: &ImageUpload) -> Result<(), AppError> {
    if !is_image_content_type(&image.content_type) {
        return Err(AppError::Validation(format!(
            "File '{}' is not an image ({})",
            image.file_name, image.content_type
        )));
    }

    if image.data.len() > MAX_IMAGE_SIZE {
        return Err(AppError::Validation(format!(
            "Image '{}' is too large. Maximum size is {} MB",
            image.file_name,
            MAX_IMAGE_SIZE / 1024 / 1024
        )));
    }

    Ok(())
}

/// Checks the whole image set of a submission
pub fn validate_images(images: &[ImageUpload]) -> Result<(), AppError> {
    if images.len() > MAX_IMAGES_PER_SUBMISSION {
        return Err(too_many_images());
    }
    images.iter().try_for_each(validate_image)
}

fn too_many_images() -> AppError {
    AppError::Validation(format!(
        "A maximum of {} images is allowed",
        MAX_IMAGES_PER_SUBMISSION
    ))
}

/// Text fields and images collected from a multipart submission
#[derive(Debug, Default)]
pub struct SubmissionForm {
    fields: HashMap<String, String>,
    pub images: Vec<ImageUpload>,
}

impl SubmissionForm {
    /// Reads every part of the body. Parts named `image_field` are collected
    /// as images; all other parts are read as text.
    pub async fn read(mut multipart: Multipart, image_field: &str) -> Result<Self, AppError> {
        let mut form = SubmissionForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let field_name = field.name().unwrap_or("").to_string();

            if field_name == image_field {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                // Browsers send an empty part when no file was picked
                if file_name.is_empty() && content_type == "application/octet-stream" {
                    continue;
                }

                if form.images.len() >= MAX_IMAGES_PER_SUBMISSION {
                    return Err(too_many_images());
                }

                if !is_image_content_type(&content_type) {
                    return Err(AppError::Validation(format!(
                        "File '{}' is not an image ({})",
                        file_name, content_type
                    )));
                }

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                let image = ImageUpload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                };
                validate_image(&image)?;
                form.images.push(image);
            } else {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field '{}': {}", field_name, e))
                })?;
                form.fields.insert(field_name, text);
            }
        }

        Ok(form)
    }

    /// Removes and returns a text field
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    #[cfg(test)]
    pub fn with_fields(fields: &[(&str, &str)], images: Vec<ImageUpload>) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            images,
        }
    }
}

#[cfg(test)]
pub fn fake_image(name: &str, size: usize) -> ImageUpload {
    ImageUpload {
        file_name: name.to_string(),
        content_type: "image/png".to_string(),
        data: vec![0u8; size],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_images_accepted() {
        let images: Vec<_> = (0..5).map(|i| fake_image(&format!("{}.png", i), 10)).collect();
        assert!(validate_images(&images).is_ok());
    }

    #[test]
    fn test_six_images_rejected() {
        let images: Vec<_> = (0..6).map(|i| fake_image(&format!("{}.png", i), 10)).collect();
        assert!(matches!(validate_images(&images), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_image_size_limit_is_inclusive() {
        assert!(validate_image(&fake_image("a.png", MAX_IMAGE_SIZE)).is_ok());
        assert!(validate_image(&fake_image("a.png", MAX_IMAGE_SIZE + 1)).is_err());
    }

    #[test]
    fn test_non_image_rejected() {
        let file = ImageUpload {
            file_name: "doc.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: vec![1, 2, 3],
        };
        assert!(validate_image(&file).is_err());
    }

    #[test]
    fn test_extension_prefers_content_type() {
        let mut image = fake_image("photo.PNG", 1);
        image.content_type = "image/jpeg".to_string();
        assert_eq!(image.extension(), "jpg");

        image.content_type = "image/x-unknown".to_string();
        assert_eq!(image.extension(), "png");

        image.file_name = "noext".to_string();
        assert_eq!(image.extension(), "bin");
    }
}
