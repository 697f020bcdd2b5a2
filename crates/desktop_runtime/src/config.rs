//! Shell configuration loaded from TOML.
//!
//! Every field has a default, so an empty document yields [`ShellConfig::default`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Point, Size};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse shell config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("`{field}` must be positive, found {value}")]
    NonPositive { field: &'static str, value: i64 },
    #[error("`{field}` must not be negative, found {value}")]
    Negative { field: &'static str, value: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    pub window: WindowConfig,
    pub drag: DragConfig,
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Size used when a registry entry declares none, and the maximize-restore fallback.
    pub default_size: Size,
    /// Resize floor applied by the drag controller.
    pub min_size: Size,
    /// Position of the first cascaded window.
    pub cascade_origin: Point,
    /// Per-window cascade offset on both axes.
    pub cascade_step: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            default_size: Size::default(),
            min_size: Size::new(20, 20),
            cascade_origin: Point { x: 40, y: 48 },
            cascade_step: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DragConfig {
    /// Pointer travel needed to pull a snapped window free.
    pub unsnap_threshold_px: i32,
    /// Distance from a viewport edge at which a snap preview appears.
    pub edge_snap_threshold_px: i32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            unsnap_threshold_px: 20,
            edge_snap_threshold_px: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Delay between marking every window closing and clearing the desktop.
    pub close_all_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { close_all_ms: 300 }
    }
}

impl ShellConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed TOML, unknown keys, or out-of-range values.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("window.default_size.width", self.window.default_size.width),
            ("window.default_size.height", self.window.default_size.height),
            ("window.min_size.width", self.window.min_size.width),
            ("window.min_size.height", self.window.min_size.height),
        ];
        for (field, value) in sizes {
            if value <= 0 {
                return Err(ConfigError::NonPositive {
                    field,
                    value: value.into(),
                });
            }
        }

        let offsets = [
            ("window.cascade_step", self.window.cascade_step),
            ("drag.unsnap_threshold_px", self.drag.unsnap_threshold_px),
            ("drag.edge_snap_threshold_px", self.drag.edge_snap_threshold_px),
        ];
        for (field, value) in offsets {
            if value < 0 {
                return Err(ConfigError::Negative {
                    field,
                    value: value.into(),
                });
            }
        }
        Ok(())
    }

    pub fn close_all_delay(&self) -> Duration {
        Duration::from_millis(self.animation.close_all_ms)
    }
}
