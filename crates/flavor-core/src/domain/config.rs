//! Configuration schema for a user's flavor.
//!
//! A [`FlavorConfig`] is stored once per user under the module namespace
//! ([`MODULE_ID`]) and key ([`CONFIG_KEY`]).  The JSON shape uses camelCase
//! field names because every client reads the same stored document:
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "enabled": true,
//!   "customizations": {
//!     "fontSize": 14,
//!     "borderWidth": 2,
//!     "borderRadius": 8,
//!     "padding": 12,
//!     "glowIntensity": 10,
//!     "glowEnabled": false,
//!     "shadowEnabled": true,
//!     "borderStyle": "solid"
//!   },
//!   "customHtml": null
//! }
//! ```
//!
//! # Default template
//!
//! [`FlavorConfig::default()`] is the default template.  It builds a fresh
//! value on every call, so no caller can mutate a shared baseline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Namespace under which every flavor value is stored.
pub const MODULE_ID: &str = "flavor";

/// Key of the per-user configuration inside [`MODULE_ID`].
pub const CONFIG_KEY: &str = "config";

/// Schema version stamped on every validated configuration.
///
/// Bump when the persisted shape changes incompatibly.  Stored documents
/// without a version are treated as version 0.
pub const SCHEMA_VERSION: u32 = 1;

// ── Numeric bounds ────────────────────────────────────────────────────────────

/// Inclusive range for a bounded integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericBound {
    pub min: u32,
    pub max: u32,
}

impl NumericBound {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Clamps a signed value into the range.
    pub fn clamp(&self, value: i64) -> u32 {
        // min/max are u32 so the clamped value always fits.
        value.clamp(i64::from(self.min), i64::from(self.max)) as u32
    }

    /// Returns `true` if `value` lies inside the range.
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Bounds for `customizations.fontSize`.
pub const FONT_SIZE: NumericBound = NumericBound::new(8, 32);
/// Bounds for `customizations.borderWidth`.
pub const BORDER_WIDTH: NumericBound = NumericBound::new(0, 10);
/// Bounds for `customizations.borderRadius`.
pub const BORDER_RADIUS: NumericBound = NumericBound::new(0, 30);
/// Bounds for `customizations.padding`.
pub const PADDING: NumericBound = NumericBound::new(0, 30);
/// Bounds for `customizations.glowIntensity`.
pub const GLOW_INTENSITY: NumericBound = NumericBound::new(0, 30);

// ── Border style ──────────────────────────────────────────────────────────────

/// CSS border style of a flavored card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
    Groove,
    Ridge,
}

impl BorderStyle {
    /// Every accepted style, in declaration order.
    pub const ALL: [BorderStyle; 6] = [
        BorderStyle::Solid,
        BorderStyle::Dashed,
        BorderStyle::Dotted,
        BorderStyle::Double,
        BorderStyle::Groove,
        BorderStyle::Ridge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Double => "double",
            BorderStyle::Groove => "groove",
            BorderStyle::Ridge => "ridge",
        }
    }
}

impl fmt::Display for BorderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the accepted border styles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown border style: {0:?}")]
pub struct UnknownBorderStyle(pub String);

impl FromStr for BorderStyle {
    type Err = UnknownBorderStyle;

    /// Matching is exact and case-sensitive, like the stored JSON.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BorderStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| UnknownBorderStyle(s.to_string()))
    }
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Visual knobs of a flavored card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customizations {
    /// Text size in pixels, [`FONT_SIZE`].
    pub font_size: u32,
    /// Border thickness in pixels, [`BORDER_WIDTH`].
    pub border_width: u32,
    /// Corner radius in pixels, [`BORDER_RADIUS`].
    pub border_radius: u32,
    /// Inner spacing in pixels, [`PADDING`].
    pub padding: u32,
    /// Glow blur radius in pixels, [`GLOW_INTENSITY`].
    pub glow_intensity: u32,
    pub glow_enabled: bool,
    pub shadow_enabled: bool,
    pub border_style: BorderStyle,
}

/// A user's complete flavor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorConfig {
    /// Version of the persisted shape, see [`SCHEMA_VERSION`].
    pub schema_version: u32,
    /// Master switch for the feature.
    pub enabled: bool,
    pub customizations: Customizations,
    /// Raw markup wrapped around the card.  Only kept when the acting user
    /// is privileged or the world allows custom markup.
    pub custom_html: Option<String>,
}

impl Default for Customizations {
    fn default() -> Self {
        Self {
            font_size: 14,
            border_width: 2,
            border_radius: 8,
            padding: 12,
            glow_intensity: 10,
            glow_enabled: false,
            shadow_enabled: true,
            border_style: BorderStyle::Solid,
        }
    }
}

impl Default for FlavorConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            enabled: true,
            customizations: Customizations::default(),
            custom_html: None,
        }
    }
}

impl Customizations {
    /// Returns `true` if every numeric field lies inside its bound.
    pub fn is_within_bounds(&self) -> bool {
        FONT_SIZE.contains(self.font_size)
            && BORDER_WIDTH.contains(self.border_width)
            && BORDER_RADIUS.contains(self.border_radius)
            && PADDING.contains(self.padding)
            && GLOW_INTENSITY.contains(self.glow_intensity)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_is_within_bounds() {
        let cfg = FlavorConfig::default();
        assert!(cfg.customizations.is_within_bounds());
        assert_eq!(cfg.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_default_template_values() {
        let c = Customizations::default();
        assert_eq!(c.font_size, 14);
        assert_eq!(c.border_width, 2);
        assert_eq!(c.border_radius, 8);
        assert_eq!(c.padding, 12);
        assert_eq!(c.glow_intensity, 10);
        assert_eq!(c.border_style, BorderStyle::Solid);
    }

    #[test]
    fn test_default_template_has_no_custom_html() {
        assert_eq!(FlavorConfig::default().custom_html, None);
    }

    #[test]
    fn test_numeric_bound_clamps_both_ends() {
        assert_eq!(FONT_SIZE.clamp(999), 32);
        assert_eq!(FONT_SIZE.clamp(-5), 8);
        assert_eq!(FONT_SIZE.clamp(20), 20);
        assert_eq!(BORDER_WIDTH.clamp(i64::MIN), 0);
    }

    #[test]
    fn test_border_style_parses_every_variant() {
        for style in BorderStyle::ALL {
            assert_eq!(style.as_str().parse::<BorderStyle>(), Ok(style));
        }
    }

    #[test]
    fn test_border_style_parse_is_case_sensitive() {
        assert!("Solid".parse::<BorderStyle>().is_err());
        assert!("italic".parse::<BorderStyle>().is_err());
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        // Arrange
        let cfg = FlavorConfig::default();

        // Act
        let json = serde_json::to_value(&cfg).expect("serialize");

        // Assert
        assert_eq!(json["schemaVersion"], 1);
        assert_eq!(json["customizations"]["fontSize"], 14);
        assert_eq!(json["customizations"]["borderStyle"], "solid");
        assert!(json["customHtml"].is_null(), "absent markup must serialize as null");
    }
}
