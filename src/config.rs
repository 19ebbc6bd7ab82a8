use serde::Deserialize;

use crate::error::MenuError;

/// Dispatcher-wide defaults. Menus may override the click defaults through
/// their own [`ClickPolicy`](crate::ClickPolicy).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Cancel the host's default action for clicks on empty slots and outside the window.
    pub cancel_unmapped_clicks: bool,
    /// Raw slots above this are treated as malformed and dropped.
    pub max_raw_slot: i32,
    /// Flush dirty slots after every routed click, not only on `Refresh`.
    pub flush_after_click: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            cancel_unmapped_clicks: true,
            // 54 chest slots + 36 player slots, with headroom
            max_raw_slot: 125,
            flush_after_click: false,
        }
    }
}

impl DispatcherConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, MenuError> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(DispatcherConfig::from_toml_str("").unwrap(), DispatcherConfig::default());
    }

    #[test]
    fn partial_toml() {
        let config = DispatcherConfig::from_toml_str("flush_after_click = true\nmax_raw_slot = 89").unwrap();
        assert!(config.flush_after_click);
        assert!(config.cancel_unmapped_clicks);
        assert_eq!(config.max_raw_slot, 89);
    }

    #[test]
    fn bad_toml() {
        match DispatcherConfig::from_toml_str("max_raw_slot = \"many\"") {
            Err(MenuError::Config(_)) => {}
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
