//! World-level settings read by the manager.
//!
//! Only one setting matters today: [`ALLOW_CUSTOM_HTML`] under the module
//! namespace, which lets non-privileged users keep custom markup.

use std::collections::HashMap;

/// Key of the "custom raw markup allowed" world setting.
pub const ALLOW_CUSTOM_HTML: &str = "allowCustomHtml";

/// Read access to world settings.
pub trait WorldSettings: Send + Sync {
    /// Reads a boolean setting.  `None` when the setting is not registered.
    fn get_bool(&self, namespace: &str, key: &str) -> Option<bool>;
}

/// Settings held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticWorldSettings {
    values: HashMap<(String, String), bool>,
}

impl StaticWorldSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, namespace: &str, key: &str, value: bool) -> Self {
        self.set(namespace, key, value);
        self
    }

    pub fn set(&mut self, namespace: &str, key: &str, value: bool) {
        self.values
            .insert((namespace.to_string(), key.to_string()), value);
    }
}

impl WorldSettings for StaticWorldSettings {
    fn get_bool(&self, namespace: &str, key: &str) -> Option<bool> {
        self.values
            .get(&(namespace.to_string(), key.to_string()))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flavor_core::MODULE_ID;

    #[test]
    fn test_unregistered_setting_is_none() {
        assert_eq!(StaticWorldSettings::new().get_bool(MODULE_ID, ALLOW_CUSTOM_HTML), None);
    }

    #[test]
    fn test_set_value_is_read_back() {
        let settings = StaticWorldSettings::new().with(MODULE_ID, ALLOW_CUSTOM_HTML, true);
        assert_eq!(settings.get_bool(MODULE_ID, ALLOW_CUSTOM_HTML), Some(true));
        assert_eq!(settings.get_bool("other", ALLOW_CUSTOM_HTML), None);
    }
}
