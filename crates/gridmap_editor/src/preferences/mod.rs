//! Editor preferences persisted per user

mod file;

pub use file::PreferencesError;

use serde::{Deserialize, Serialize};

/// User-level settings that change how the tools behave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    /// Paint and bucket fill use smart paths whenever the brush allows it
    pub smart_paths_enabled: bool,
    /// Size offered for new maps
    pub default_map_width: u32,
    pub default_map_height: u32,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            smart_paths_enabled: false,
            default_map_width: 20,
            default_map_height: 20,
        }
    }
}
