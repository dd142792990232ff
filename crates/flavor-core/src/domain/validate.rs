//! The validation routine.
//!
//! [`validate`] turns any [`ConfigPatch`] into a [`FlavorConfig`] that satisfies
//! every schema invariant.  Invalid input is never rejected; it is normalized:
//!
//! 1. The candidate is overlaid onto a fresh default template.
//! 2. `enabled` is coerced to a boolean.
//! 3. Each bounded integer is clamped.  Missing or unusable values fall back
//!    to the template value first.
//! 4. `glowEnabled` and `shadowEnabled` are coerced to booleans.
//! 5. An unknown `borderStyle` becomes `solid`.
//! 6. `customHtml` is dropped unless the [`MarkupPolicy`] allows it.
//!
//! # Coercion rules
//!
//! Booleans follow JSON truthiness: `null`, `false`, `0`, and `""` are false,
//! everything else is true.  Integers accept JSON numbers and numeric strings;
//! fractions round to the nearest integer.  Anything else is unusable.

use serde_json::Value;
use tracing::{debug, warn};

use super::config::{
    BorderStyle, Customizations, FlavorConfig, NumericBound, BORDER_RADIUS, BORDER_WIDTH,
    FONT_SIZE, GLOW_INTENSITY, PADDING, SCHEMA_VERSION,
};
use super::identity::UserIdentity;
use super::patch::{ConfigPatch, CustomizationsPatch};

/// Whether `customHtml` may survive validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupPolicy {
    allow_custom_html: bool,
}

impl MarkupPolicy {
    /// Markup is kept.
    pub const fn allow() -> Self {
        Self {
            allow_custom_html: true,
        }
    }

    /// Markup is nulled out.
    pub const fn deny() -> Self {
        Self {
            allow_custom_html: false,
        }
    }

    /// Markup is kept when the world setting allows it or the acting user is
    /// privileged.
    pub fn for_session(world_allows_custom_html: bool, acting: &UserIdentity) -> Self {
        Self {
            allow_custom_html: world_allows_custom_html || acting.is_privileged(),
        }
    }

    pub fn allows_custom_html(&self) -> bool {
        self.allow_custom_html
    }
}

/// Produces a sanitized configuration from an untrusted candidate.
///
/// Pure: the candidate is borrowed and never modified.
pub fn validate(candidate: &ConfigPatch, policy: MarkupPolicy) -> FlavorConfig {
    let defaults = FlavorConfig::default();
    let merged = ConfigPatch::from_config(&defaults).overlay(candidate.clone());

    let customizations = match merged.customizations {
        Some(ref c) => sanitize_customizations(c, &defaults.customizations),
        None => defaults.customizations.clone(),
    };

    let mut custom_html = match merged.custom_html {
        Some(Value::String(html)) if !html.is_empty() => Some(html),
        _ => None,
    };
    if custom_html.is_some() && !policy.allows_custom_html() {
        debug!("custom markup not permitted for this session; discarding");
        custom_html = None;
    }

    FlavorConfig {
        schema_version: SCHEMA_VERSION,
        enabled: coerce_bool(merged.enabled.as_ref(), defaults.enabled),
        customizations,
        custom_html,
    }
}

/// Normalizes a value read back from the store.
///
/// Applies the structural rules of [`validate`] but never the markup gate:
/// the markup was judged against the writer's privileges when it was saved.
/// Documents without `schemaVersion` predate versioning and are upgraded.
pub fn normalize_stored(stored: &Value) -> FlavorConfig {
    let patch = ConfigPatch::from_value(stored);
    match patch.schema_version.as_ref().and_then(Value::as_u64) {
        None => debug!("upgrading unversioned flavor config to v{SCHEMA_VERSION}"),
        Some(v) if v > u64::from(SCHEMA_VERSION) => warn!(
            "stored flavor config has schema v{v}, newer than supported v{SCHEMA_VERSION}; \
             reading it leniently"
        ),
        Some(_) => {}
    }
    validate(&patch, MarkupPolicy::allow())
}

fn sanitize_customizations(c: &CustomizationsPatch, defaults: &Customizations) -> Customizations {
    Customizations {
        font_size: clamp_field(c.font_size.as_ref(), defaults.font_size, FONT_SIZE),
        border_width: clamp_field(c.border_width.as_ref(), defaults.border_width, BORDER_WIDTH),
        border_radius: clamp_field(c.border_radius.as_ref(), defaults.border_radius, BORDER_RADIUS),
        padding: clamp_field(c.padding.as_ref(), defaults.padding, PADDING),
        glow_intensity: clamp_field(
            c.glow_intensity.as_ref(),
            defaults.glow_intensity,
            GLOW_INTENSITY,
        ),
        glow_enabled: coerce_bool(c.glow_enabled.as_ref(), defaults.glow_enabled),
        shadow_enabled: coerce_bool(c.shadow_enabled.as_ref(), defaults.shadow_enabled),
        border_style: c
            .border_style
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(BorderStyle::Solid),
    }
}

fn clamp_field(value: Option<&Value>, fallback: u32, bound: NumericBound) -> u32 {
    match value.and_then(as_number) {
        // `as` saturates, so huge magnitudes land on the bound.
        Some(n) => bound.clamp(n.round() as i64),
        None => bound.clamp(i64::from(fallback)),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn coerce_bool(value: Option<&Value>, fallback: bool) -> bool {
    value.map_or(fallback, is_truthy)
}

/// Truthiness of a loosely typed value: `null`, `false`, `0`, `NaN` and `""`
/// are false, everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
