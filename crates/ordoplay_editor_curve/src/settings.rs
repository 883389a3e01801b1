// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve editor configuration.

use crate::error::Result;
use crate::keyframe::InterpolationMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-axis switch for zoom, panning and axis display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UseMode {
    /// Disabled on both axes
    Off,
    /// Time axis only
    Horizontal,
    /// Value axis only
    Vertical,
    /// Both axes
    #[default]
    On,
}

impl UseMode {
    /// Whether the time axis is enabled
    pub fn horizontal(self) -> bool {
        matches!(self, Self::Horizontal | Self::On)
    }

    /// Whether the value axis is enabled
    pub fn vertical(self) -> bool {
        matches!(self, Self::Vertical | Self::On)
    }

    /// Build from per-axis flags
    pub fn from_axes(horizontal: bool, vertical: bool) -> Self {
        match (horizontal, vertical) {
            (true, true) => Self::On,
            (true, false) => Self::Horizontal,
            (false, true) => Self::Vertical,
            (false, false) => Self::Off,
        }
    }
}

/// Settings for a curve editor instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveEditorSettings {
    /// Upper bound on keyframe count
    pub max_keyframes: usize,
    /// Keyframe time quantization rate
    pub fps: Option<f32>,
    /// Interpolation law of new curves
    pub interpolation: InterpolationMode,
    /// Which axes draw grid lines and labels
    pub show_axes: UseMode,
    /// Which axes can be zoomed
    pub enable_zoom: UseMode,
    /// Which axes can be panned
    pub enable_panning: UseMode,
    /// Draw vertical lines at the first and last keyframe
    pub show_start_end_lines: bool,
    /// Fill the widget background
    pub show_background: bool,
    /// Smallest view zoom factor
    pub min_scale: f32,
    /// Largest view zoom factor
    pub max_scale: f32,
}

impl Default for CurveEditorSettings {
    fn default() -> Self {
        Self {
            max_keyframes: usize::MAX,
            fps: None,
            interpolation: InterpolationMode::Linear,
            show_axes: UseMode::On,
            enable_zoom: UseMode::On,
            enable_panning: UseMode::On,
            show_start_end_lines: false,
            show_background: true,
            min_scale: 0.01,
            max_scale: 100.0,
        }
    }
}

impl CurveEditorSettings {
    /// Parse settings from RON text
    pub fn from_ron_str(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    /// Serialize settings to pretty RON text
    pub fn to_ron_string(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}
