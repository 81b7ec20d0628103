use std::fs;
use std::path::Path;

use anyhow::{ensure, Context};
use avatar::NavigatorConfig;
use glam::Vec3;
use rubik::{DragConfig, RotatorConfig, DEFAULT_ROTATION_SPEED};
use serde::Deserialize;
use tracing::info;

/// Configuration loaded from rubikscape.toml
///
/// Every section and field is optional; missing values take the defaults
/// below.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RubikscapeConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub navigator: NavigatorSection,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub tiles: TilesConfig,
}

impl RubikscapeConfig {
    /// Read and validate a config file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.grid.spacing.is_finite() && self.grid.spacing > 0.0,
            "grid spacing must be positive"
        );
        ensure!(self.simulation.tick_rate > 0.0, "tick rate must be positive");
        ensure!(self.simulation.max_ticks > 0, "max ticks must be >= 1");
        ensure!(self.tiles.variant_count > 0, "at least one tile variant is required");
        ensure!(
            self.rotation.min_swipe_distance >= 0.0 && self.rotation.max_selection_distance > 0.0,
            "swipe distance must not be negative and selection distance must be positive"
        );
        self.navigator_config().validate()?;
        Ok(())
    }

    pub fn rotator_config(&self) -> RotatorConfig {
        RotatorConfig {
            speed: self.rotation.speed,
        }
    }

    pub fn drag_config(&self) -> DragConfig {
        DragConfig {
            min_swipe_distance: self.rotation.min_swipe_distance,
            max_selection_distance: self.rotation.max_selection_distance,
        }
    }

    pub fn navigator_config(&self) -> NavigatorConfig {
        let nav = &self.navigator;
        NavigatorConfig {
            detection_radius: nav.detection_radius,
            speed: nav.speed,
            rotation_speed: nav.rotation_speed,
            tile_detection_radius: nav.tile_detection_radius,
            arrival_threshold: nav.arrival_threshold,
            tie_epsilon: nav.tie_epsilon,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GridConfig {
    /// Distance between neighbouring cell centres
    #[serde(default = "default_spacing")]
    pub spacing: f32,
    /// World position of the grid centre
    #[serde(default)]
    pub origin: [f32; 3],
}

fn default_spacing() -> f32 {
    1.0
}

impl GridConfig {
    pub fn origin(&self) -> Vec3 {
        Vec3::from_array(self.origin)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing: default_spacing(),
            origin: [0.0; 3],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RotationConfig {
    /// Degrees per second
    #[serde(default = "default_rotation_speed")]
    pub speed: f32,
    /// Drag length that turns a slice
    #[serde(default = "default_min_swipe_distance")]
    pub min_swipe_distance: f32,
    /// Grab reach around a cell centre
    #[serde(default = "default_max_selection_distance")]
    pub max_selection_distance: f32,
}

fn default_rotation_speed() -> f32 {
    DEFAULT_ROTATION_SPEED
}

fn default_min_swipe_distance() -> f32 {
    DragConfig::default().min_swipe_distance
}

fn default_max_selection_distance() -> f32 {
    DragConfig::default().max_selection_distance
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            speed: default_rotation_speed(),
            min_swipe_distance: default_min_swipe_distance(),
            max_selection_distance: default_max_selection_distance(),
        }
    }
}

/// `[navigator]` section, mirrors [`NavigatorConfig`]
#[derive(Debug, Deserialize, Clone)]
pub struct NavigatorSection {
    #[serde(default = "default_detection_radius")]
    pub detection_radius: f32,
    #[serde(default = "default_walk_speed")]
    pub speed: f32,
    #[serde(default = "default_turn_speed")]
    pub rotation_speed: f32,
    #[serde(default = "default_tile_detection_radius")]
    pub tile_detection_radius: f32,
    #[serde(default = "default_arrival_threshold")]
    pub arrival_threshold: f32,
    #[serde(default = "default_tie_epsilon")]
    pub tie_epsilon: f32,
}

fn default_detection_radius() -> f32 {
    NavigatorConfig::default().detection_radius
}

fn default_walk_speed() -> f32 {
    NavigatorConfig::default().speed
}

fn default_turn_speed() -> f32 {
    NavigatorConfig::default().rotation_speed
}

fn default_tile_detection_radius() -> f32 {
    NavigatorConfig::default().tile_detection_radius
}

fn default_arrival_threshold() -> f32 {
    NavigatorConfig::default().arrival_threshold
}

fn default_tie_epsilon() -> f32 {
    NavigatorConfig::default().tie_epsilon
}

impl Default for NavigatorSection {
    fn default() -> Self {
        Self {
            detection_radius: default_detection_radius(),
            speed: default_walk_speed(),
            rotation_speed: default_turn_speed(),
            tile_detection_radius: default_tile_detection_radius(),
            arrival_threshold: default_arrival_threshold(),
            tie_epsilon: default_tie_epsilon(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationConfig {
    /// Ticks per second
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f32,
    /// Hard stop for scripted runs
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u32,
}

fn default_tick_rate() -> f32 {
    60.0
}

fn default_max_ticks() -> u32 {
    36_000 // ten minutes at 60 Hz
}

impl SimulationConfig {
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: default_tick_rate(),
            max_ticks: default_max_ticks(),
        }
    }
}

/// How painted tile variants map onto the walkable course
#[derive(Debug, Deserialize, Clone)]
pub struct TilesConfig {
    /// Number of tile variants a level may reference
    #[serde(default = "default_variant_count")]
    pub variant_count: usize,
    /// Variant marking the avatar's start tile
    #[serde(default)]
    pub start_variant: usize,
    /// Variants carrying a normal goal point
    #[serde(default = "default_path_variants")]
    pub path_variants: Vec<usize>,
    /// Variants carrying a junction goal point
    #[serde(default = "default_branch_variants")]
    pub branch_variants: Vec<usize>,
    /// Height of goal points above the tile surface
    #[serde(default = "default_goal_height")]
    pub goal_height: f32,
}

fn default_variant_count() -> usize {
    4
}

fn default_path_variants() -> Vec<usize> {
    vec![1]
}

fn default_branch_variants() -> Vec<usize> {
    vec![2]
}

fn default_goal_height() -> f32 {
    0.25
}

impl Default for TilesConfig {
    fn default() -> Self {
        Self {
            variant_count: default_variant_count(),
            start_variant: 0,
            path_variants: default_path_variants(),
            branch_variants: default_branch_variants(),
            goal_height: default_goal_height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = RubikscapeConfig::from_toml_str("").unwrap();
        assert_eq!(config.grid.spacing, 1.0);
        assert_eq!(config.rotation.speed, 90.0);
        assert_eq!(config.navigator_config(), NavigatorConfig::default());
        assert_eq!(config.simulation.tick_rate, 60.0);
        assert_eq!(config.tiles.path_variants, vec![1]);
    }

    #[test]
    fn test_partial_sections() {
        let config = RubikscapeConfig::from_toml_str(
            r#"
            [grid]
            spacing = 2.0
            origin = [0.0, 1.5, 0.0]

            [navigator]
            detection_radius = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.origin(), Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(config.navigator.detection_radius, 1.5);
        assert_eq!(config.navigator.speed, 4.0);
    }

    #[test]
    fn test_drag_settings() {
        let config = RubikscapeConfig::from_toml_str(
            "[rotation]\nmin_swipe_distance = 0.2\nmax_selection_distance = 0.4",
        )
        .unwrap();
        let drag = config.drag_config();
        assert_eq!(drag.min_swipe_distance, 0.2);
        assert_eq!(drag.max_selection_distance, 0.4);
        assert_eq!(RubikscapeConfig::default().drag_config(), DragConfig::default());
        assert!(RubikscapeConfig::from_toml_str("[rotation]\nmax_selection_distance = 0.0").is_err());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(RubikscapeConfig::from_toml_str("[grid]\nspacing = 0.0").is_err());
        assert!(RubikscapeConfig::from_toml_str("[navigator]\nspeed = -1.0").is_err());
        assert!(RubikscapeConfig::from_toml_str("[tiles]\nvariant_count = 0").is_err());
    }
}
