//! Error types for the tag-extraction pipeline.
//!
//! This module defines the errors that can occur while segmenting pages,
//! recognizing text through the OCR collaborator, and assembling tags. It
//! also provides utility functions for creating these errors with
//! appropriate context.

use thiserror::Error;

/// Enum representing different stages of processing in the pipeline.
///
/// This enum is used to identify which stage of the pipeline an error
/// occurred in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingStage {
    /// Error occurred while preparing a page raster.
    PagePreparation,
    /// Error occurred during figure/table region extraction.
    RegionExtraction,
    /// Error occurred while processing a page end to end.
    PageProcessing,
    /// Error occurred during tag post-processing.
    PostProcessing,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::PagePreparation => write!(f, "page preparation"),
            ProcessingStage::RegionExtraction => write!(f, "region extraction"),
            ProcessingStage::PageProcessing => write!(f, "page processing"),
            ProcessingStage::PostProcessing => write!(f, "post-processing"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Result type used throughout the crate.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Enum representing the errors that can occur in the pipeline.
///
/// Collaborator failures (recognition, storage) are wrapped rather than
/// redefined so embedders can surface their own error types through the
/// source chain.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error occurred while loading an image.
    #[error("Failed to load image")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error reported by the OCR collaborator.
    #[error("Recognition error")]
    Recognition(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Error reported by the tag storage collaborator.
    #[error("Tag storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Error indicating invalid input.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error parsing the spell dictionary file.
    #[error("Failed to parse spell dictionary")]
    DictionaryParse(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error")]
    Io(#[from] std::io::Error),
}

/// Implementation of PipelineError with utility functions for creating errors.
impl PipelineError {
    /// Creates a PipelineError for a specific processing stage.
    ///
    /// # Arguments
    ///
    /// * `kind` - The stage of processing where the error occurred.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a PipelineError for post-processing operations.
    pub fn post_processing(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::PostProcessing,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a PipelineError wrapping an OCR collaborator failure.
    pub fn recognition_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Recognition(Box::new(error))
    }

    /// Creates a PipelineError wrapping a storage collaborator failure.
    pub fn storage_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(error))
    }

    /// Creates a PipelineError for invalid input.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a PipelineError for configuration errors.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a PipelineError for validation failures with context.
    ///
    /// # Arguments
    ///
    /// * `component` - The component where the error occurred.
    /// * `field` - The field that failed validation.
    /// * `expected` - The expected value.
    /// * `actual` - The actual value.
    pub fn validation_error(component: &str, field: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidInput {
            message: format!(
                "Validation failed in {}: field '{}' expected {}, but got '{}'",
                component, field, expected, actual
            ),
        }
    }
}

impl From<image::ImageError> for PipelineError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

impl From<crate::core::config::ConfigError> for PipelineError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}
