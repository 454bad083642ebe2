//! Settings for the `vrd` command surface.

use serde::{Deserialize, Serialize};

/// Page size when neither `--limit` nor a config file sets one.
const fn default_limit() -> u32 {
    20
}

/// The `[general]` table: defaults applied to `vrd` list commands
/// (`submission list`, `summary list`). `--limit` overrides it per call.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}
