use serde::{Deserialize, Serialize};

use crate::constants::{ACCEL_STRENGTH, AGENT_COUNT, AGENT_SEED, CASCADE_LEVELS, MAX_SPEED};
use crate::error::LumenError;
use crate::obstacle::{ObstacleRect, DEFAULT_OBSTACLES};
use crate::schedule::cascade_resolutions;
use crate::types::Resolution;

/// Scene description read once at setup. Missing fields fall back to the
/// compile-time defaults in `constants.rs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub agent_count: u32,
    pub accel_strength: f32,
    pub max_speed: f32,
    pub cascade_levels: u32,
    pub agent_seed: u32,
    pub obstacles: Vec<ObstacleRect>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            agent_count: AGENT_COUNT,
            accel_strength: ACCEL_STRENGTH,
            max_speed: MAX_SPEED,
            cascade_levels: CASCADE_LEVELS,
            agent_seed: AGENT_SEED,
            obstacles: DEFAULT_OBSTACLES.to_vec(),
        }
    }
}

impl SceneConfig {
    /// Parse a scene from RON and validate it.
    pub fn from_ron(ron_str: &str) -> Result<Self, LumenError> {
        let options = ron::Options::default();
        let config: SceneConfig = options
            .from_str(ron_str)
            .map_err(|e| LumenError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that do not depend on the surface size.
    pub fn validate(&self) -> Result<(), LumenError> {
        if self.cascade_levels == 0 {
            return Err(LumenError::InvalidConfig(
                "cascade_levels must be at least 1".into(),
            ));
        }
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(LumenError::InvalidConfig(format!(
                "max_speed must be positive, got {}",
                self.max_speed
            )));
        }
        if !(self.accel_strength.is_finite() && self.accel_strength >= 0.0) {
            return Err(LumenError::InvalidConfig(format!(
                "accel_strength must be non-negative, got {}",
                self.accel_strength
            )));
        }
        for rect in &self.obstacles {
            rect.validate()?;
        }
        Ok(())
    }

    /// Full validation against the base field resolution.
    pub fn validate_for(&self, base: Resolution) -> Result<(), LumenError> {
        self.validate()?;
        cascade_resolutions(base, self.cascade_levels).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_SCENE: &str = include_str!("../../../data/scenes/default.ron");

    #[test]
    fn test_default_scene_file_matches_defaults() {
        let config = SceneConfig::from_ron(DEFAULT_SCENE).unwrap();
        assert_eq!(config, SceneConfig::default());
        assert_eq!(config.obstacles.len(), 3);
    }

    #[test]
    fn test_partial_scene_uses_defaults() {
        let config = SceneConfig::from_ron("(agent_count: 0, obstacles: [])").unwrap();
        assert_eq!(config.agent_count, 0);
        assert!(config.obstacles.is_empty());
        assert_eq!(config.cascade_levels, CASCADE_LEVELS);
        assert_eq!(config.max_speed, MAX_SPEED);
    }

    #[test]
    fn test_rejects_zero_levels() {
        let err = SceneConfig::from_ron("(cascade_levels: 0)").unwrap_err();
        assert!(matches!(err, LumenError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_bad_speed_and_accel() {
        assert!(SceneConfig::from_ron("(max_speed: 0.0)").is_err());
        assert!(SceneConfig::from_ron("(accel_strength: -1.0)").is_err());
    }

    #[test]
    fn test_rejects_rect_out_of_range() {
        let err =
            SceneConfig::from_ron("(obstacles: [(x: 1.2, y: 0.0, width: 0.1, height: 0.1)])")
                .unwrap_err();
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn test_malformed_ron() {
        assert!(SceneConfig::from_ron("(agent_count: ").is_err());
    }

    #[test]
    fn test_validate_for_small_surface() {
        let config = SceneConfig::default();
        assert!(config.validate_for(Resolution::new(64, 64)).is_ok());
        assert!(config.validate_for(Resolution::new(2, 64)).is_err());
    }
}
