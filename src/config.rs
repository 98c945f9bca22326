//! Style parser configuration.
//!
//! `StyleParserConfig` holds the renderer defaults the [`StyleParser`](crate::StyleParser)
//! falls back to when a symbolizer leaves a value unspecified. Sensible defaults are
//! available through [`Default`], and [`StyleParserConfig::builder()`] offers a fluent
//! builder with validation.
//!
//! # Examples
//!
//! ```rust
//! use scenestyle::config::StyleParserConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = StyleParserConfig::builder()
//!     .default_dash_length(8.0)
//!     .default_font_family("Noto Sans")
//!     .default_font_size(12.0)
//!     .build()?;
//! assert_eq!(cfg.default_font_family, "Noto Sans");
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `default_dash_length`: dash length in pixels when a dash array cannot be encoded (default: 16).
//! - `default_font_family`: family used when a text symbolizer names none (default: `sans-serif`).
//! - `default_font_size`: font size in px when a text symbolizer has no size (default: 14).
//! - `default_classification`: classification used by fills and lines without `msClassificationType`.
//! - `leader_line_min_extent`: smallest side, in pixels, of a rasterized label leader line (default: 1).
//! - `leader_line_max_extent`: largest side, in pixels, of a rasterized label leader line (default: 1024).

use std::fmt;

use crate::scene::ClassificationType;

#[derive(Debug, Clone, PartialEq)]
pub struct StyleParserConfig {
    pub default_dash_length: f64,
    pub default_font_family: String,
    pub default_font_size: f64,
    pub default_classification: ClassificationType,
    pub leader_line_min_extent: u32,
    pub leader_line_max_extent: u32,
}

impl Default for StyleParserConfig {
    fn default() -> Self {
        Self {
            default_dash_length: 16.0,
            default_font_family: "sans-serif".to_string(),
            default_font_size: 14.0,
            default_classification: ClassificationType::Both,
            leader_line_min_extent: 1,
            leader_line_max_extent: 1024,
        }
    }
}

impl StyleParserConfig {
    pub fn builder() -> StyleParserConfigBuilder {
        StyleParserConfigBuilder::default()
    }
}

/// Builder for [`StyleParserConfig`].
#[derive(Debug, Clone, Default)]
pub struct StyleParserConfigBuilder {
    inner: StyleParserConfig,
}

impl StyleParserConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut StyleParserConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn default_dash_length(self, px: f64) -> Self { self.map(|c| c.default_dash_length = px) }
    pub fn default_font_family<S: Into<String>>(self, family: S) -> Self { self.map(|c| c.default_font_family = family.into()) }
    pub fn default_font_size(self, px: f64) -> Self { self.map(|c| c.default_font_size = px) }
    pub fn default_classification(self, ct: ClassificationType) -> Self { self.map(|c| c.default_classification = ct) }
    pub fn leader_line_min_extent(self, px: u32) -> Self { self.map(|c| c.leader_line_min_extent = px) }
    pub fn leader_line_max_extent(self, px: u32) -> Self { self.map(|c| c.leader_line_max_extent = px) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut StyleParserConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<StyleParserConfig, StyleParserConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq)]
pub enum StyleParserConfigError {
    InvalidDashLength(f64),
    InvalidFontSize(f64),
    EmptyFontFamily,
    ZeroLeaderExtent,
    InvalidLeaderExtentRange { min: u32, max: u32 },
}

impl fmt::Display for StyleParserConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleParserConfigError::InvalidDashLength(l) =>
                write!(f, "default_dash_length {l} must be a positive number"),
            StyleParserConfigError::InvalidFontSize(s) =>
                write!(f, "default_font_size {s} must be a positive number"),
            StyleParserConfigError::EmptyFontFamily =>
                write!(f, "default_font_family must not be empty"),
            StyleParserConfigError::ZeroLeaderExtent =>
                write!(f, "leader_line_min_extent must be at least 1"),
            StyleParserConfigError::InvalidLeaderExtentRange { min, max } =>
                write!(f, "leader_line_max_extent {max} is below leader_line_min_extent {min}"),
        }
    }
}
impl std::error::Error for StyleParserConfigError {}

fn validate(c: &StyleParserConfig) -> Result<(), StyleParserConfigError> {
    if !(c.default_dash_length.is_finite() && c.default_dash_length > 0.0) {
        return Err(StyleParserConfigError::InvalidDashLength(c.default_dash_length));
    }
    if !(c.default_font_size.is_finite() && c.default_font_size > 0.0) {
        return Err(StyleParserConfigError::InvalidFontSize(c.default_font_size));
    }
    if c.default_font_family.trim().is_empty() {
        return Err(StyleParserConfigError::EmptyFontFamily);
    }
    if c.leader_line_min_extent == 0 {
        return Err(StyleParserConfigError::ZeroLeaderExtent);
    }
    if c.leader_line_max_extent < c.leader_line_min_extent {
        return Err(StyleParserConfigError::InvalidLeaderExtentRange {
            min: c.leader_line_min_extent,
            max: c.leader_line_max_extent,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let built = StyleParserConfig::builder().build().unwrap();
        assert_eq!(built, StyleParserConfig::default());
    }

    #[test]
    fn builder_rejects_invalid_values() {
        assert_eq!(
            StyleParserConfig::builder().default_dash_length(0.0).build(),
            Err(StyleParserConfigError::InvalidDashLength(0.0))
        );
        assert_eq!(
            StyleParserConfig::builder().default_font_size(-2.0).build(),
            Err(StyleParserConfigError::InvalidFontSize(-2.0))
        );
        assert_eq!(
            StyleParserConfig::builder().default_font_family("  ").build(),
            Err(StyleParserConfigError::EmptyFontFamily)
        );
        assert_eq!(
            StyleParserConfig::builder().leader_line_min_extent(0).build(),
            Err(StyleParserConfigError::ZeroLeaderExtent)
        );
        assert_eq!(
            StyleParserConfig::builder()
                .leader_line_min_extent(8)
                .leader_line_max_extent(4)
                .build(),
            Err(StyleParserConfigError::InvalidLeaderExtentRange { min: 8, max: 4 })
        );
    }

    #[test]
    fn with_applies_several_changes() {
        let cfg = StyleParserConfig::builder()
            .with(|c| {
                c.default_font_size = 20.0;
                c.default_classification = ClassificationType::Terrain;
            })
            .build()
            .unwrap();
        assert_eq!(cfg.default_font_size, 20.0);
        assert_eq!(cfg.default_classification, ClassificationType::Terrain);
    }
}
