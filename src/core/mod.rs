//! The core module of the extraction pipeline.
//!
//! This module contains the fundamental components shared by the rest of
//! the crate, including:
//! - Configuration management and validation
//! - Error handling
//! - Collaborator traits for recognition and storage
//!
//! It also provides re-exports of commonly used types and functions for
//! convenience.

pub mod config;
pub mod errors;
pub mod traits;

pub use crate::utils::{dynamic_to_gray, load_gray_image, load_gray_images};
pub use config::{
    ConfigError, ConfigValidator, ConfigValidatorExt, PipelineConfig, RegionConfig, SpellConfig,
};
pub use errors::{PipelineError, PipelineResult, ProcessingStage};
pub use traits::{OcrEngine, RawDetection, TagStore};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
