//! Configuration types and validation for the tag-extraction pipeline.
//!
//! All tuning parameters live in explicit structs with named, typed,
//! defaulted fields. Every struct validates once at pipeline construction
//! through the [`ConfigValidator`] trait; invalid values are surfaced as
//! [`ConfigError`] values, never panics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration value is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that validation of a nested configuration failed.
    #[error("validation failed: {message}")]
    ValidationFailed { message: String },
}

impl From<ConfigError> for String {
    fn from(error: ConfigError) -> Self {
        error.to_string()
    }
}

/// A trait for validating configuration parameters.
///
/// Implementors supply `validate` and `get_defaults`; the provided methods
/// cover the recurring range checks so call sites stay uniform.
pub trait ConfigValidator {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates a confidence threshold.
    ///
    /// This method checks that the confidence threshold is between 0.0 and 1.0.
    fn validate_confidence_threshold(&self, threshold: f32) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&threshold) {
            Err(ConfigError::InvalidConfig {
                message: format!(
                    "Confidence threshold must be between 0.0 and 1.0, got {}",
                    threshold
                ),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a float value is within a specified range.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `min` - The minimum allowed value (inclusive).
    /// * `max` - The maximum allowed value (inclusive).
    /// * `field_name` - The name of the field being validated.
    fn validate_f32_range(
        &self,
        value: f32,
        min: f32,
        max: f32,
        field_name: &str,
    ) -> Result<(), ConfigError> {
        if value < min || value > max {
            Err(ConfigError::InvalidConfig {
                message: format!(
                    "{} must be between {} and {}, got {}",
                    field_name, min, max, value
                ),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a float value is strictly greater than a bound.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `bound` - The exclusive lower bound.
    /// * `field_name` - The name of the field being validated.
    fn validate_greater_than(
        &self,
        value: f32,
        bound: f32,
        field_name: &str,
    ) -> Result<(), ConfigError> {
        if value <= bound {
            Err(ConfigError::InvalidConfig {
                message: format!(
                    "{} must be greater than {}, got {}",
                    field_name, bound, value
                ),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a float value is positive.
    fn validate_positive_f32(&self, value: f32, field_name: &str) -> Result<(), ConfigError> {
        if value <= 0.0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{} must be greater than 0, got {}", field_name, value),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a usize value is positive.
    fn validate_positive_usize(&self, value: usize, field_name: &str) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{} must be greater than 0, got {}", field_name, value),
            })
        } else {
            Ok(())
        }
    }
}

/// Extension trait for ConfigValidator that provides error wrapping.
///
/// Component constructors validate their configuration inline with
/// `config.validate_and_wrap()?`, converting validation failures into
/// [`PipelineError::ConfigError`](crate::core::errors::PipelineError).
pub trait ConfigValidatorExt: ConfigValidator {
    /// Validates the configuration, returning it on success.
    fn validate_and_wrap(self) -> Result<Self, crate::core::errors::PipelineError>
    where
        Self: Sized,
    {
        self.validate()
            .map_err(|e| crate::core::errors::PipelineError::ConfigError {
                message: e.to_string(),
            })?;
        Ok(self)
    }
}

impl<T: ConfigValidator> ConfigValidatorExt for T {}

/// Tuning parameters for figure/table region extraction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Contours with area below `min_area_ratio * image_area` are discarded.
    pub min_area_ratio: f32,
    /// Contours whose bounding rectangle comes within
    /// `edge_margin_ratio * image_dimension` of any image edge are discarded
    /// as scan artifacts.
    pub edge_margin_ratio: f32,
    /// Consecutive-area ratio above which the primary candidate group stops
    /// absorbing smaller contours.
    pub area_drop_off_ratio: f32,
    /// Inward padding applied to region crops, in pixels.
    pub crop_padding: u32,
    /// Grayscale threshold for binarization; pixels above it become white.
    pub binarize_threshold: u8,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            min_area_ratio: 0.01,
            edge_margin_ratio: 0.005,
            area_drop_off_ratio: 1.75,
            crop_padding: 5,
            binarize_threshold: 127,
        }
    }
}

impl RegionConfig {
    /// Creates a new RegionConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum contour area ratio.
    pub fn with_min_area_ratio(mut self, ratio: f32) -> Self {
        self.min_area_ratio = ratio;
        self
    }

    /// Sets the edge artifact margin ratio.
    pub fn with_edge_margin_ratio(mut self, ratio: f32) -> Self {
        self.edge_margin_ratio = ratio;
        self
    }

    /// Sets the area drop-off ratio.
    pub fn with_area_drop_off_ratio(mut self, ratio: f32) -> Self {
        self.area_drop_off_ratio = ratio;
        self
    }

    /// Sets the crop padding in pixels.
    pub fn with_crop_padding(mut self, padding: u32) -> Self {
        self.crop_padding = padding;
        self
    }
}

impl ConfigValidator for RegionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_f32_range(self.min_area_ratio, 0.0, 1.0, "min_area_ratio")?;
        self.validate_f32_range(self.edge_margin_ratio, 0.0, 0.5, "edge_margin_ratio")?;
        self.validate_greater_than(self.area_drop_off_ratio, 1.0, "area_drop_off_ratio")?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Tuning parameters for dictionary-based spell correction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellConfig {
    /// Maximum edit distance a suggestion may have from the queried word.
    pub max_edit_distance: usize,
}

impl Default for SpellConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: 2,
        }
    }
}

impl SpellConfig {
    /// Creates a new SpellConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum edit distance for suggestions.
    pub fn with_max_edit_distance(mut self, distance: usize) -> Self {
        self.max_edit_distance = distance;
        self
    }
}

impl ConfigValidator for SpellConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive_usize(self.max_edit_distance, "max_edit_distance")?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Top-level configuration for the document pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Region extraction tuning.
    pub region: RegionConfig,
    /// Spell correction tuning.
    pub spell: SpellConfig,
    /// Upscaling factor applied when pages were rasterized for OCR.
    pub render_scale: f32,
    /// Detections below this confidence never reach the merger.
    pub min_confidence: f32,
    /// Page rasters are padded so both dimensions are multiples of this.
    pub pad_stride: u32,
    /// Documents with more pages than this are processed in parallel.
    pub page_threshold: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            region: RegionConfig::default(),
            spell: SpellConfig::default(),
            render_scale: 4.0,
            min_confidence: 0.6,
            pad_stride: 32,
            page_threshold: 1,
        }
    }
}

impl PipelineConfig {
    /// Creates a new PipelineConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the region extraction configuration.
    pub fn with_region(mut self, region: RegionConfig) -> Self {
        self.region = region;
        self
    }

    /// Sets the spell correction configuration.
    pub fn with_spell(mut self, spell: SpellConfig) -> Self {
        self.spell = spell;
        self
    }

    /// Sets the render scale.
    pub fn with_render_scale(mut self, scale: f32) -> Self {
        self.render_scale = scale;
        self
    }

    /// Sets the minimum detection confidence.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence;
        self
    }

    /// Sets the sequential/parallel page threshold.
    pub fn with_page_threshold(mut self, threshold: usize) -> Self {
        self.page_threshold = threshold;
        self
    }
}

impl ConfigValidator for PipelineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.region
            .validate()
            .map_err(|e| ConfigError::ValidationFailed {
                message: format!("region: {}", e),
            })?;
        self.spell
            .validate()
            .map_err(|e| ConfigError::ValidationFailed {
                message: format!("spell: {}", e),
            })?;
        self.validate_positive_f32(self.render_scale, "render_scale")?;
        self.validate_confidence_threshold(self.min_confidence)?;
        self.validate_positive_usize(self.pad_stride as usize, "pad_stride")?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
