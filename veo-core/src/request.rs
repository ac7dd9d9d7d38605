//! Generation request building
//!
//! Turns raw user input into a validated `GenerateVideoRequest` payload plus
//! the inputs recorded on the resulting job. Nothing here touches the network.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::domain::job::SourceImageRef;
use crate::dto::generation::{
    GenerateVideoRequest, GenerationParameters, ImageInput, PromptInstance,
};

/// Image mime types accepted by the generation API
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png"];

pub const MIN_SAMPLE_COUNT: u8 = 1;
pub const MAX_SAMPLE_COUNT: u8 = 4;
pub const MIN_DURATION_SECONDS: u8 = 5;
pub const MAX_DURATION_SECONDS: u8 = 8;

/// Input rejected before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("A prompt or an image is required")]
    MissingInput,

    #[error("Unsupported image type '{0}' (expected image/jpeg or image/png)")]
    UnsupportedImageType(String),

    #[error("Image is empty")]
    EmptyImage,

    #[error("Sample count {0} is out of range (1-4)")]
    SampleCountOutOfRange(u8),

    #[error("Duration {0}s is out of range (5-8s)")]
    DurationOutOfRange(u8),
}

/// Inputs recorded on a job created from this request
#[derive(Debug, Clone, PartialEq)]
pub struct JobInputs {
    pub prompt: String,
    pub source_image: Option<SourceImageRef>,
    pub parameters: GenerationParameters,
}

/// A validated request ready for submission
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub payload: GenerateVideoRequest,
    pub inputs: JobInputs,
}

#[derive(Debug, Clone)]
struct ImageSource {
    bytes: Vec<u8>,
    mime_type: String,
    label: Option<String>,
}

/// Builder for `GenerationRequest`
///
/// Defaults match the generation form: one sample, five seconds, prompt
/// enhancement on, no storage URI.
#[derive(Debug, Clone)]
pub struct GenerationRequestBuilder {
    prompt: Option<String>,
    image: Option<ImageSource>,
    sample_count: u8,
    duration_seconds: u8,
    enhance_prompt: bool,
    storage_uri: Option<String>,
}

impl Default for GenerationRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationRequestBuilder {
    pub fn new() -> Self {
        Self {
            prompt: None,
            image: None,
            sample_count: MIN_SAMPLE_COUNT,
            duration_seconds: MIN_DURATION_SECONDS,
            enhance_prompt: true,
            storage_uri: None,
        }
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Attaches a source image
    ///
    /// # Arguments
    /// * `bytes` - Raw image bytes, base64 encoded on `build`
    /// * `mime_type` - Declared type, checked against `ALLOWED_IMAGE_TYPES`
    pub fn image(mut self, bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        self.image = Some(ImageSource {
            bytes,
            mime_type: mime_type.into(),
            label: None,
        });
        self
    }

    /// Names the attached image (e.g. its file name) for display
    pub fn image_label(mut self, label: impl Into<String>) -> Self {
        if let Some(image) = self.image.as_mut() {
            image.label = Some(label.into());
        }
        self
    }

    pub fn sample_count(mut self, sample_count: u8) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn duration_seconds(mut self, duration_seconds: u8) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn enhance_prompt(mut self, enhance_prompt: bool) -> Self {
        self.enhance_prompt = enhance_prompt;
        self
    }

    pub fn storage_uri(mut self, storage_uri: impl Into<String>) -> Self {
        self.storage_uri = Some(storage_uri.into());
        self
    }

    /// Validates the input and produces the request
    pub fn build(self) -> Result<GenerationRequest, ValidationError> {
        let prompt = self
            .prompt
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        if prompt.is_none() && self.image.is_none() {
            return Err(ValidationError::MissingInput);
        }

        if let Some(image) = &self.image {
            if !ALLOWED_IMAGE_TYPES.contains(&image.mime_type.as_str()) {
                return Err(ValidationError::UnsupportedImageType(
                    image.mime_type.clone(),
                ));
            }
            if image.bytes.is_empty() {
                return Err(ValidationError::EmptyImage);
            }
        }

        if !(MIN_SAMPLE_COUNT..=MAX_SAMPLE_COUNT).contains(&self.sample_count) {
            return Err(ValidationError::SampleCountOutOfRange(self.sample_count));
        }

        if !(MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&self.duration_seconds) {
            return Err(ValidationError::DurationOutOfRange(self.duration_seconds));
        }

        let parameters = GenerationParameters {
            sample_count: self.sample_count,
            duration_seconds: self.duration_seconds,
            enhance_prompt: self.enhance_prompt,
            storage_uri: self
                .storage_uri
                .map(|uri| uri.trim().to_string())
                .filter(|uri| !uri.is_empty()),
        };

        let source_image = self.image.as_ref().map(|image| SourceImageRef {
            mime_type: image.mime_type.clone(),
            size_bytes: image.bytes.len(),
            label: image.label.clone(),
        });

        let instance = PromptInstance {
            prompt: prompt.clone(),
            image: self.image.map(|image| ImageInput {
                bytes_base64_encoded: STANDARD.encode(&image.bytes),
                mime_type: image.mime_type,
            }),
        };

        Ok(GenerationRequest {
            payload: GenerateVideoRequest {
                instances: vec![instance],
                parameters: parameters.clone(),
            },
            inputs: JobInputs {
                prompt: prompt.unwrap_or_default(),
                source_image,
                parameters,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_prompt_with_defaults() {
        let request = GenerationRequestBuilder::new()
            .prompt("  a dog running  ")
            .build()
            .unwrap();

        let instance = &request.payload.instances[0];
        assert_eq!(instance.prompt.as_deref(), Some("a dog running"));
        assert!(instance.image.is_none());
        assert_eq!(request.payload.parameters.sample_count, 1);
        assert_eq!(request.payload.parameters.duration_seconds, 5);
        assert!(request.payload.parameters.enhance_prompt);
        assert_eq!(request.inputs.prompt, "a dog running");
        assert!(request.inputs.source_image.is_none());
    }

    #[test]
    fn test_missing_prompt_and_image() {
        let err = GenerationRequestBuilder::new().build().unwrap_err();
        assert_eq!(err, ValidationError::MissingInput);

        let err = GenerationRequestBuilder::new()
            .prompt("   ")
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingInput);
    }

    #[test]
    fn test_image_only_request() {
        let request = GenerationRequestBuilder::new()
            .image(vec![0xff, 0xd8, 0xff], "image/jpeg")
            .image_label("cat.jpg")
            .build()
            .unwrap();

        let instance = &request.payload.instances[0];
        assert!(instance.prompt.is_none());
        let image = instance.image.as_ref().unwrap();
        assert_eq!(image.bytes_base64_encoded, "/9j/");
        assert_eq!(image.mime_type, "image/jpeg");

        let source = request.inputs.source_image.unwrap();
        assert_eq!(source.size_bytes, 3);
        assert_eq!(source.label.as_deref(), Some("cat.jpg"));
        assert_eq!(request.inputs.prompt, "");
    }

    #[test]
    fn test_rejects_unsupported_image_type() {
        let err = GenerationRequestBuilder::new()
            .prompt("a cat")
            .image(vec![1, 2, 3], "image/gif")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedImageType("image/gif".to_string())
        );
    }

    #[test]
    fn test_rejects_empty_image() {
        let err = GenerationRequestBuilder::new()
            .image(Vec::new(), "image/png")
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyImage);
    }

    #[test]
    fn test_sample_count_bounds() {
        for count in [0u8, 5, 200] {
            let err = GenerationRequestBuilder::new()
                .prompt("x")
                .sample_count(count)
                .build()
                .unwrap_err();
            assert_eq!(err, ValidationError::SampleCountOutOfRange(count));
        }

        for count in MIN_SAMPLE_COUNT..=MAX_SAMPLE_COUNT {
            let request = GenerationRequestBuilder::new()
                .prompt("x")
                .sample_count(count)
                .build()
                .unwrap();
            assert_eq!(request.payload.parameters.sample_count, count);
        }
    }

    #[test]
    fn test_duration_bounds() {
        let err = GenerationRequestBuilder::new()
            .prompt("x")
            .duration_seconds(4)
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::DurationOutOfRange(4));

        let err = GenerationRequestBuilder::new()
            .prompt("x")
            .duration_seconds(9)
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::DurationOutOfRange(9));

        assert!(
            GenerationRequestBuilder::new()
                .prompt("x")
                .duration_seconds(8)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_blank_storage_uri_is_dropped() {
        let request = GenerationRequestBuilder::new()
            .prompt("x")
            .storage_uri("")
            .build()
            .unwrap();
        assert!(request.payload.parameters.storage_uri.is_none());

        let request = GenerationRequestBuilder::new()
            .prompt("x")
            .storage_uri("gs://bucket/out/")
            .enhance_prompt(false)
            .build()
            .unwrap();
        assert_eq!(
            request.payload.parameters.storage_uri.as_deref(),
            Some("gs://bucket/out/")
        );
        assert!(!request.inputs.parameters.enhance_prompt);
    }
}
