use serde::Deserialize;

use crate::config::ConfigError;
use crate::core::geometry::Point;
use crate::core::velocity::{
    FRICTION, MIN_VELOCITY, UPDATE_INTERVAL_MS, VELOCITY_HISTORY_SIZE, VELOCITY_THRESHOLD,
};

const GRID_JSON: &str = include_str!("../assets/grid.json");

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    pub grid_size: f64,
    #[serde(default)]
    pub initial_position: Point,
    #[serde(default)]
    pub physics: PhysicsConfig,
    pub size_range: SizeRange,
    #[serde(default)]
    pub palette: Vec<[u8; 3]>,
}

/// 拖拽 / 惯性物理参数，缺省字段取内置常量
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub min_velocity: f64,
    pub update_interval_ms: f64,
    pub velocity_history_size: usize,
    pub friction: f64,
    pub velocity_threshold: f64,
    /// 停止移动判定的防抖时长
    pub stop_debounce_ms: f64,
    /// offset 离开静止点超过此距离才算「移动中」
    pub moving_threshold_px: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            min_velocity: MIN_VELOCITY,
            update_interval_ms: UPDATE_INTERVAL_MS,
            velocity_history_size: VELOCITY_HISTORY_SIZE,
            friction: FRICTION,
            velocity_threshold: VELOCITY_THRESHOLD,
            stop_debounce_ms: 200.0,
            moving_threshold_px: 5.0,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("min_velocity", self.min_velocity),
            ("update_interval_ms", self.update_interval_ms),
            ("velocity_threshold", self.velocity_threshold),
            ("stop_debounce_ms", self.stop_debounce_ms),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidPhysics { field, value });
            }
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(ConfigError::InvalidPhysics {
                field: "friction",
                value: self.friction,
            });
        }
        if !(self.moving_threshold_px.is_finite() && self.moving_threshold_px >= 0.0) {
            return Err(ConfigError::InvalidPhysics {
                field: "moving_threshold_px",
                value: self.moving_threshold_px,
            });
        }
        if self.velocity_history_size == 0 {
            return Err(ConfigError::InvalidPhysics {
                field: "velocity_history_size",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// 尺寸滑块的取值范围（像素）
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
}

impl SizeRange {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl GridConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_grid_size(self.grid_size) {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        let SizeRange { min, max } = self.size_range;
        if !(is_valid_grid_size(min) && max.is_finite() && min <= max) {
            return Err(ConfigError::InvalidSizeRange { min, max });
        }
        self.physics.validate()
    }
}

/// 格子尺寸下限（像素）。再小的格子既不可辨认，也会让可见集合过大
pub const MIN_GRID_SIZE: f64 = 4.0;

pub fn is_valid_grid_size(value: f64) -> bool {
    value.is_finite() && value >= MIN_GRID_SIZE
}

pub fn load_grid_config() -> Result<GridConfig, ConfigError> {
    GridConfig::from_json(GRID_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_loads() {
        let config = load_grid_config().unwrap();
        assert_eq!(config.grid_size, 80.0);
        assert_eq!(config.initial_position, Point::ZERO);
        assert_eq!(config.physics, PhysicsConfig::default());
        assert_eq!(config.size_range, SizeRange { min: 50.0, max: 200.0 });
        assert_eq!(config.palette.len(), 13);
    }

    #[test]
    fn test_physics_defaults_fill_missing_fields() {
        let json = r#"{
            "grid_size": 100,
            "initial_position": { "x": 40, "y": -8 },
            "physics": { "friction": 0.8 },
            "size_range": { "min": 50, "max": 200 }
        }"#;
        let config = GridConfig::from_json(json).unwrap();
        assert_eq!(config.initial_position, Point::new(40.0, -8.0));
        assert_eq!(config.physics.friction, 0.8);
        assert_eq!(config.physics.min_velocity, MIN_VELOCITY);
        assert!(config.palette.is_empty());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let bad_size = r#"{ "grid_size": 0, "size_range": { "min": 50, "max": 200 } }"#;
        assert!(matches!(
            GridConfig::from_json(bad_size),
            Err(ConfigError::InvalidGridSize(_))
        ));

        let bad_range = r#"{ "grid_size": 80, "size_range": { "min": 300, "max": 200 } }"#;
        assert!(matches!(
            GridConfig::from_json(bad_range),
            Err(ConfigError::InvalidSizeRange { .. })
        ));

        let bad_friction = r#"{
            "grid_size": 80,
            "physics": { "friction": 1.5 },
            "size_range": { "min": 50, "max": 200 }
        }"#;
        assert!(matches!(
            GridConfig::from_json(bad_friction),
            Err(ConfigError::InvalidPhysics { field: "friction", .. })
        ));

        assert!(matches!(GridConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_grid_size_floor() {
        assert!(is_valid_grid_size(MIN_GRID_SIZE));
        assert!(is_valid_grid_size(80.0));
        assert!(!is_valid_grid_size(1e-6));
        assert!(!is_valid_grid_size(MIN_GRID_SIZE - 0.5));
        assert!(!is_valid_grid_size(f64::INFINITY));

        let tiny = r#"{ "grid_size": 0.5, "size_range": { "min": 50, "max": 200 } }"#;
        assert!(matches!(
            GridConfig::from_json(tiny),
            Err(ConfigError::InvalidGridSize(_))
        ));

        let tiny_range = r#"{ "grid_size": 80, "size_range": { "min": 1, "max": 200 } }"#;
        assert!(matches!(
            GridConfig::from_json(tiny_range),
            Err(ConfigError::InvalidSizeRange { .. })
        ));
    }
}
