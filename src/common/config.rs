use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::sys::geometry::Orientation;

/// Engine configuration. Every option has a default; unknown keys reject
/// the whole config at deserialization time.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub default_root_container_layout: DefaultLayout,
    #[serde(default)]
    pub default_root_container_orientation: DefaultOrientation,
    /// Peel per side, in pixels, for the accordion layout.
    #[serde(default = "default_accordion_padding")]
    pub accordion_padding: f64,
    /// Rebuild default and balance target for dwindle split ratios.
    /// 1.0 means an even 50/50 split.
    #[serde(default = "default_split_ratio")]
    pub dwindle_default_split_ratio: f64,
    /// Bias applied to the aspect ratio when choosing a dwindle split
    /// orientation. Values above 1.0 favour stacked (top/bottom) splits.
    #[serde(default = "one")]
    pub split_width_multiplier: f64,
    #[serde(default = "default_master_percent")]
    pub master_default_percent: f64,
    /// Share of the workspace width given to the anchored window in the
    /// scroll layout.
    #[serde(default = "default_focused_width_ratio")]
    pub focused_width_ratio: f64,
    #[serde(default)]
    pub gaps: GapSettings,
    /// Multiplier on the pixel-to-ratio conversion for pointer resizes.
    #[serde(default = "one")]
    pub mouse_sensitivity: f64,
    #[serde(default = "yes")]
    pub no_outer_gaps_in_fullscreen: bool,
    /// Normalisation: single-child non-root containers are dissolved into
    /// their parent.
    #[serde(default = "yes")]
    pub flatten_single_child_containers: bool,
    /// Normalisation: a container nested in one of the same orientation is
    /// flipped to the perpendicular orientation.
    #[serde(default = "yes")]
    pub alternate_nested_orientation: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum DefaultLayout {
    #[default]
    Tiles,
    Accordion,
    Dwindle,
    Scroll,
    Master,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum DefaultOrientation {
    Horizontal,
    Vertical,
    /// Follow the monitor: wide monitors get horizontal roots.
    #[default]
    Auto,
}

impl DefaultOrientation {
    pub fn resolve(self, monitor_width: f64, monitor_height: f64) -> Orientation {
        match self {
            DefaultOrientation::Horizontal => Orientation::Horizontal,
            DefaultOrientation::Vertical => Orientation::Vertical,
            DefaultOrientation::Auto => {
                if monitor_width >= monitor_height {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                }
            }
        }
    }
}

/// Gap configuration for window spacing.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct GapSettings {
    /// Space between windows and the workspace edges.
    #[serde(default)]
    pub outer: OuterGaps,
    /// Space between adjacent windows.
    #[serde(default)]
    pub inner: InnerGaps,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct OuterGaps {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub right: f64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct InnerGaps {
    #[serde(default)]
    pub horizontal: f64,
    #[serde(default)]
    pub vertical: f64,
}

impl InnerGaps {
    pub fn uniform(gap: f64) -> InnerGaps { InnerGaps { horizontal: gap, vertical: gap } }

    pub fn along(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.horizontal,
            Orientation::Vertical => self.vertical,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            default_root_container_layout: DefaultLayout::default(),
            default_root_container_orientation: DefaultOrientation::default(),
            accordion_padding: default_accordion_padding(),
            dwindle_default_split_ratio: default_split_ratio(),
            split_width_multiplier: one(),
            master_default_percent: default_master_percent(),
            focused_width_ratio: default_focused_width_ratio(),
            gaps: GapSettings::default(),
            mouse_sensitivity: one(),
            no_outer_gaps_in_fullscreen: yes(),
            flatten_single_child_containers: yes(),
            alternate_nested_orientation: yes(),
        }
    }
}

impl EngineConfig {
    /// Checks every option against its documented range.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.accordion_padding < 0.0 {
            issues.push(format!(
                "accordion_padding must be non-negative, got {}",
                self.accordion_padding
            ));
        }
        if !(0.1..=1.9).contains(&self.dwindle_default_split_ratio) {
            issues.push(format!(
                "dwindle_default_split_ratio must be in [0.1, 1.9], got {}",
                self.dwindle_default_split_ratio
            ));
        }
        if self.split_width_multiplier <= 0.0 {
            issues.push(format!(
                "split_width_multiplier must be positive, got {}",
                self.split_width_multiplier
            ));
        }
        if !(0.1..=0.9).contains(&self.master_default_percent) {
            issues.push(format!(
                "master_default_percent must be in [0.1, 0.9], got {}",
                self.master_default_percent
            ));
        }
        if !(0.1..=1.0).contains(&self.focused_width_ratio) {
            issues.push(format!(
                "focused_width_ratio must be in [0.1, 1.0], got {}",
                self.focused_width_ratio
            ));
        }
        if self.mouse_sensitivity <= 0.0 {
            issues.push(format!(
                "mouse_sensitivity must be positive, got {}",
                self.mouse_sensitivity
            ));
        }
        issues.extend(self.gaps.validate());
        issues
    }

    /// Resets out-of-range values to their defaults, returning the number
    /// of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;
        if self.accordion_padding < 0.0 {
            self.accordion_padding = default_accordion_padding();
            fixes += 1;
        }
        if !(0.1..=1.9).contains(&self.dwindle_default_split_ratio) {
            self.dwindle_default_split_ratio = default_split_ratio();
            fixes += 1;
        }
        if self.split_width_multiplier <= 0.0 {
            self.split_width_multiplier = one();
            fixes += 1;
        }
        if !(0.1..=0.9).contains(&self.master_default_percent) {
            self.master_default_percent = default_master_percent();
            fixes += 1;
        }
        if !(0.1..=1.0).contains(&self.focused_width_ratio) {
            self.focused_width_ratio = default_focused_width_ratio();
            fixes += 1;
        }
        if self.mouse_sensitivity <= 0.0 {
            self.mouse_sensitivity = one();
            fixes += 1;
        }
        fixes += self.gaps.auto_fix_values();
        fixes
    }

    /// Accepts a config for use by the engine, rejecting invalid values.
    pub fn accept(self) -> anyhow::Result<EngineConfig> {
        let issues = self.validate();
        if !issues.is_empty() {
            bail!("invalid configuration: {}", issues.join("; "));
        }
        Ok(self)
    }
}

impl GapSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for (name, value) in [
            ("outer.top", self.outer.top),
            ("outer.left", self.outer.left),
            ("outer.bottom", self.outer.bottom),
            ("outer.right", self.outer.right),
            ("inner.horizontal", self.inner.horizontal),
            ("inner.vertical", self.inner.vertical),
        ] {
            if value < 0.0 {
                issues.push(format!("{name} gap must be non-negative, got {value}"));
            }
        }
        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;
        for value in [
            &mut self.outer.top,
            &mut self.outer.left,
            &mut self.outer.bottom,
            &mut self.outer.right,
            &mut self.inner.horizontal,
            &mut self.inner.vertical,
        ] {
            if *value < 0.0 {
                *value = 0.0;
                fixes += 1;
            }
        }
        fixes
    }
}

fn yes() -> bool { true }
fn one() -> f64 { 1.0 }
fn default_accordion_padding() -> f64 { 30.0 }
fn default_split_ratio() -> f64 { 1.0 }
fn default_master_percent() -> f64 { 0.5 }
fn default_focused_width_ratio() -> f64 { 0.8 }
