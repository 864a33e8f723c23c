use crate::GroveError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Accepted range for the user facing repelling force.
pub const REPEL_FORCE_RANGE: RangeInclusive<f32> = 5.0..=60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CanvasSettings {
    pub layout: LayoutSettings,
    pub timing: TimingSettings,
    pub fit: FitSettings,
    pub tooltip: TooltipSettings,
}

impl CanvasSettings {
    pub fn from_json(raw: &str) -> Result<Self, GroveError> {
        let settings: Self = serde_json::from_str(raw).map_err(GroveError::Settings)?;
        Ok(settings.normalized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GroveError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| GroveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Bring out-of-range values back into their valid ranges.
    pub fn normalized(mut self) -> Self {
        self.layout.repel_force = clamp_repel_force(self.layout.repel_force);
        self.layout.collision_iterations = self.layout.collision_iterations.max(1);
        self.layout.velocity_decay = self.layout.velocity_decay.clamp(0.0, 1.0);
        self.layout.alpha_decay = self.layout.alpha_decay.clamp(0.0, 1.0);
        if self.fit.min_zoom > self.fit.max_zoom {
            std::mem::swap(&mut self.fit.min_zoom, &mut self.fit.max_zoom);
        }
        self
    }
}

pub fn clamp_repel_force(value: f32) -> f32 {
    if !value.is_finite() {
        tracing::warn!("Ignoring non-finite repel force, using default");
        return default_repel_force();
    }
    let clamped = value.clamp(*REPEL_FORCE_RANGE.start(), *REPEL_FORCE_RANGE.end());
    if clamped != value {
        tracing::warn!(
            "Repel force {} outside {:?}, clamped to {}",
            value,
            REPEL_FORCE_RANGE,
            clamped
        );
    }
    clamped
}

/// Tunables of the force simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Multiplier applied to each node's radius to get its charge.
    pub repel_force: f32,
    pub link_strength: f32,
    /// Extra slack added to the sum of both radii for the link rest length.
    pub link_padding: f32,
    pub collision_padding: f32,
    pub collision_iterations: usize,
    /// Strength of the per-axis pull towards the viewport center.
    pub center_strength: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    /// Energy floor kept while a node is being dragged.
    pub drag_alpha_target: f32,
    pub initial_radius: f32,
    pub distance_min: f32,
}

fn default_repel_force() -> f32 {
    20.0
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let alpha_min = 0.001f32;
        Self {
            repel_force: default_repel_force(),
            link_strength: 0.7,
            link_padding: 40.0,
            collision_padding: 12.0,
            collision_iterations: 1,
            center_strength: 0.03,
            alpha_min,
            // Cools from 1.0 to alpha_min in roughly 300 ticks.
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
            initial_radius: 10.0,
            distance_min: 1.0,
        }
    }
}

/// Durations, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub settle_delay_ms: u64,
    pub fit_duration_ms: u64,
    pub reveal_duration_ms: u64,
    pub hover_in_ms: u64,
    pub hover_out_ms: u64,
    pub tooltip_grace_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: 1800,
            fit_duration_ms: 900,
            reveal_duration_ms: 800,
            hover_in_ms: 200,
            hover_out_ms: 300,
            tooltip_grace_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitSettings {
    pub padding: f32,
    /// Upper bound for the automatic fit. Never zoom in past 1:1.
    pub max_scale: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            padding: 100.0,
            max_scale: 1.0,
            min_zoom: 0.2,
            max_zoom: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipSettings {
    pub width: f32,
    pub margin: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for TooltipSettings {
    fn default() -> Self {
        Self {
            width: 360.0,
            margin: 16.0,
            offset_x: 16.0,
            offset_y: -20.0,
        }
    }
}
