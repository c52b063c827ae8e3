// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde::{Deserialize, Serialize};
use stipple_decollide::RelaxationConfig;
use stipple_event_state::click::ClickConfig;
use stipple_geometry::Occlusion;
use stipple_index::DEFAULT_CELL_SIZE;
use stipple_timing::{Easing, FrameBudgetConfig};
use stipple_view2d::CameraConfig;

/// Everything an owner can tune about a [`Scene`](crate::Scene).
///
/// Every field has a default, so a partial JSON object is a valid config:
///
/// ```rust
/// use stipple::SceneConfig;
///
/// let config: SceneConfig =
///     serde_json::from_str(r#"{ "margin_fraction": 0.05, "occlusion": { "left": 250 } }"#)
///         .unwrap();
/// assert_eq!(config.occlusion.left, 250.0);
/// assert!(config.auto_fit);
/// ```
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Share of the content size added on every side when fitting.
    pub margin_fraction: f64,
    /// Canvas margins covered by other UI.
    pub occlusion: Occlusion,
    /// Zoom extent, gesture timing and fit behavior.
    pub camera: CameraConfig,
    /// Refit automatically when new content falls outside the visible region.
    pub auto_fit: bool,
    /// Duration of automatic fits after the first one, which is instant.
    pub auto_fit_duration_ms: u64,
    /// Duration of explicit fits and programmatic zooms.
    pub animation_duration_ms: u64,
    /// Easing of camera animations. Not serialized.
    #[serde(skip)]
    pub easing: Easing,
    /// Hit grid cell size in canvas pixels.
    pub cell_size: f64,
    /// Radius of points that do not carry one, in data units.
    pub default_radius: f64,
    /// Resolve overlaps between points.
    pub decollide: bool,
    /// Collision relaxation parameters.
    pub relaxation: RelaxationConfig,
    /// Click thresholds.
    pub click: ClickConfig,
    /// Throttling of layout work.
    pub frame_budget: FrameBudgetConfig,
    /// Quiet period after the last resize before the view is recomputed.
    pub resize_debounce_ms: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            margin_fraction: 0.1,
            occlusion: Occlusion::NONE,
            camera: CameraConfig::default(),
            auto_fit: true,
            auto_fit_duration_ms: 500,
            animation_duration_ms: 750,
            easing: Easing::CubicInOut,
            cell_size: DEFAULT_CELL_SIZE,
            default_radius: 3.0,
            decollide: true,
            relaxation: RelaxationConfig::default(),
            click: ClickConfig::default(),
            frame_budget: FrameBudgetConfig::default(),
            resize_debounce_ms: 100,
        }
    }
}
