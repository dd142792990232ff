//! Partial configurations and the schema-aware merge.
//!
//! Candidates arrive from other clients, import files, and UI forms, so they
//! can have any JSON shape.  [`ConfigPatch::from_value`] picks out the keys the
//! schema knows about and keeps their raw JSON values; judging those values is
//! left to the validation routine.
//!
//! # Merge rules
//!
//! [`ConfigPatch::overlay`] places one patch on top of another:
//!
//! | Field            | Rule                                               |
//! |------------------|----------------------------------------------------|
//! | `schemaVersion`  | top wins when present                              |
//! | `enabled`        | top wins when present                              |
//! | `customizations` | merged field by field, top wins per field          |
//! | `customHtml`     | top wins when present, explicit `null` included    |
//!
//! An explicit JSON `null` counts as present.  That is how an update clears
//! `customHtml`.

use serde_json::{Map, Value};

use super::config::{Customizations, FlavorConfig};

/// Known keys of the `customizations` object, each holding the raw value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomizationsPatch {
    pub font_size: Option<Value>,
    pub border_width: Option<Value>,
    pub border_radius: Option<Value>,
    pub padding: Option<Value>,
    pub glow_intensity: Option<Value>,
    pub glow_enabled: Option<Value>,
    pub shadow_enabled: Option<Value>,
    pub border_style: Option<Value>,
}

/// Known top-level keys of a configuration, each holding the raw value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    pub schema_version: Option<Value>,
    pub enabled: Option<Value>,
    /// `None` when absent or when the input was not a JSON object.
    pub customizations: Option<CustomizationsPatch>,
    pub custom_html: Option<Value>,
}

impl CustomizationsPatch {
    fn from_map(map: &Map<String, Value>) -> Self {
        let field = |name: &str| map.get(name).cloned();
        Self {
            font_size: field("fontSize"),
            border_width: field("borderWidth"),
            border_radius: field("borderRadius"),
            padding: field("padding"),
            glow_intensity: field("glowIntensity"),
            glow_enabled: field("glowEnabled"),
            shadow_enabled: field("shadowEnabled"),
            border_style: field("borderStyle"),
        }
    }

    fn from_customizations(c: &Customizations) -> Self {
        Self {
            font_size: Some(Value::from(c.font_size)),
            border_width: Some(Value::from(c.border_width)),
            border_radius: Some(Value::from(c.border_radius)),
            padding: Some(Value::from(c.padding)),
            glow_intensity: Some(Value::from(c.glow_intensity)),
            glow_enabled: Some(Value::Bool(c.glow_enabled)),
            shadow_enabled: Some(Value::Bool(c.shadow_enabled)),
            border_style: Some(Value::from(c.border_style.as_str())),
        }
    }

    /// Places `top` over `self`, field by field.
    pub fn overlay(self, top: CustomizationsPatch) -> CustomizationsPatch {
        CustomizationsPatch {
            font_size: top.font_size.or(self.font_size),
            border_width: top.border_width.or(self.border_width),
            border_radius: top.border_radius.or(self.border_radius),
            padding: top.padding.or(self.padding),
            glow_intensity: top.glow_intensity.or(self.glow_intensity),
            glow_enabled: top.glow_enabled.or(self.glow_enabled),
            shadow_enabled: top.shadow_enabled.or(self.shadow_enabled),
            border_style: top.border_style.or(self.border_style),
        }
    }
}

impl ConfigPatch {
    /// Extracts the known keys from arbitrary JSON.
    ///
    /// Anything that is not an object yields an empty patch.  Unknown keys are
    /// dropped.  A `customizations` value that is not an object is treated as
    /// absent.
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        Self {
            schema_version: map.get("schemaVersion").cloned(),
            enabled: map.get("enabled").cloned(),
            customizations: map
                .get("customizations")
                .and_then(Value::as_object)
                .map(CustomizationsPatch::from_map),
            custom_html: map.get("customHtml").cloned(),
        }
    }

    /// A patch with every field of `config` present.
    pub fn from_config(config: &FlavorConfig) -> Self {
        Self {
            schema_version: Some(Value::from(config.schema_version)),
            enabled: Some(Value::Bool(config.enabled)),
            customizations: Some(CustomizationsPatch::from_customizations(
                &config.customizations,
            )),
            custom_html: Some(
                config
                    .custom_html
                    .as_deref()
                    .map_or(Value::Null, Value::from),
            ),
        }
    }

    /// Places `top` over `self` following the merge rules in the module docs.
    pub fn overlay(self, top: ConfigPatch) -> ConfigPatch {
        let customizations = match (self.customizations, top.customizations) {
            (Some(base), Some(top)) => Some(base.overlay(top)),
            (base, top) => top.or(base),
        };
        ConfigPatch {
            schema_version: top.schema_version.or(self.schema_version),
            enabled: top.enabled.or(self.enabled),
            customizations,
            custom_html: top.custom_html.or(self.custom_html),
        }
    }

    /// Returns `true` if no known key was present.
    pub fn is_empty(&self) -> bool {
        self.schema_version.is_none()
            && self.enabled.is_none()
            && self.customizations.is_none()
            && self.custom_html.is_none()
    }
}
