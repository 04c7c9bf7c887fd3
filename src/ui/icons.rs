//! Device type icons.

use std::collections::HashMap;

use crate::data::DeviceType;

const ROUTER_ICON: &str = "◎";
const SWITCH_ICON: &str = "⇄";
const FIREWALL_ICON: &str = "▣";

/// Resolves the display glyph for a device type.
///
/// Glyphs come from the `[icons]` configuration table, keyed by type name
/// ("router", "switch", "firewall", any case). Types without a configured
/// glyph fall back to a built-in one; unknown types use the router glyph.
#[derive(Debug, Clone, Default)]
pub struct IconResolver {
    configured: HashMap<String, String>,
}

impl IconResolver {
    pub fn new(configured: HashMap<String, String>) -> Self {
        let configured = configured.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect();
        Self { configured }
    }

    pub fn resolve(&self, device_type: DeviceType) -> &str {
        let key = match device_type {
            DeviceType::Switch => DeviceType::Switch,
            DeviceType::Firewall => DeviceType::Firewall,
            DeviceType::Router | DeviceType::Other => DeviceType::Router,
        };
        self.configured
            .get(&key.label().to_lowercase())
            .map(String::as_str)
            .unwrap_or_else(|| fallback(key))
    }
}

fn fallback(device_type: DeviceType) -> &'static str {
    match device_type {
        DeviceType::Switch => SWITCH_ICON,
        DeviceType::Firewall => FIREWALL_ICON,
        DeviceType::Router | DeviceType::Other => ROUTER_ICON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks() {
        let icons = IconResolver::default();
        assert_eq!(icons.resolve(DeviceType::Router), ROUTER_ICON);
        assert_eq!(icons.resolve(DeviceType::Switch), SWITCH_ICON);
        assert_eq!(icons.resolve(DeviceType::Firewall), FIREWALL_ICON);
        assert_eq!(icons.resolve(DeviceType::Other), ROUTER_ICON);
    }

    #[test]
    fn test_configured_icons_win() {
        let icons = IconResolver::new(HashMap::from([
            ("Switch".to_string(), "S".to_string()),
            ("router".to_string(), "R".to_string()),
        ]));
        assert_eq!(icons.resolve(DeviceType::Switch), "S");
        assert_eq!(icons.resolve(DeviceType::Other), "R");
        assert_eq!(icons.resolve(DeviceType::Firewall), FIREWALL_ICON);
    }
}
