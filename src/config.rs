//! Game configuration and difficulty tiers
//!
//! Every field has a default so a partial JSON document is enough to
//! override a handful of parameters.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("unknown difficulty `{0}`")]
    UnknownDifficulty(String),
}

/// Difficulty tiers selectable from the start screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Map a GUI level (1..=3, possibly fractional or out of range) to a tier
    pub fn from_level(level: f32) -> Self {
        let level = if level.is_nan() { 1 } else { level.floor() as i64 };
        match level {
            i64::MIN..=1 => Difficulty::Easy,
            2 => Difficulty::Normal,
            _ => Difficulty::Hard,
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Number of brick rows laid out at game start
    pub fn brick_rows(&self) -> u32 {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Normal => 5,
            Difficulty::Hard => 8,
        }
    }

    /// Ball speed in units per tick
    pub fn ball_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 4.0,
            Difficulty::Normal => 5.0,
            Difficulty::Hard => 6.0,
        }
    }

    /// A brick is normal when its roll in 0..=100 falls below this threshold
    pub fn normal_brick_threshold(&self) -> u32 {
        90 - self.brick_rows() / 2
    }

    /// Wall-clock limit for the tier, if any
    pub fn time_limit_secs(&self) -> Option<u32> {
        match self {
            Difficulty::Hard => Some(HARD_TIME_LIMIT_SECS),
            _ => None,
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" | "1" => Ok(Difficulty::Easy),
            "normal" | "2" => Ok(Difficulty::Normal),
            "hard" | "3" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Breakout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,

    // === Field ===
    pub field_width: f32,
    pub field_depth: f32,
    pub wall_thickness: f32,
    pub wall_height: f32,

    // === Platform ===
    pub platform_width: f32,
    pub platform_height: f32,
    pub platform_depth: f32,
    pub platform_speed: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Overrides the difficulty's ball speed when set
    pub ball_speed: Option<f32>,
    pub max_deflection: f32,

    // === Bricks ===
    pub brick_columns: u32,
    pub brick_depth: f32,
    pub brick_height: f32,
    pub brick_collider_margin: f32,
    pub normal_points: u32,
    pub special_points: u32,

    // === Power-ups ===
    pub special_speed: f32,
    pub charges_per_catch: u32,
    pub max_charges: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,

            field_width: FIELD_WIDTH,
            field_depth: FIELD_DEPTH,
            wall_thickness: WALL_THICKNESS,
            wall_height: WALL_HEIGHT,

            platform_width: PLATFORM_WIDTH,
            platform_height: PLATFORM_HEIGHT,
            platform_depth: PLATFORM_DEPTH,
            platform_speed: PLATFORM_SPEED,

            ball_radius: BALL_RADIUS,
            ball_speed: None,
            max_deflection: MAX_DEFLECTION,

            brick_columns: BRICK_COLUMNS,
            brick_depth: BRICK_DEPTH,
            brick_height: BRICK_HEIGHT,
            brick_collider_margin: BRICK_COLLIDER_MARGIN,
            normal_points: NORMAL_BRICK_POINTS,
            special_points: SPECIAL_BRICK_POINTS,

            special_speed: SPECIAL_SPEED,
            charges_per_catch: CHARGES_PER_CATCH,
            max_charges: MAX_CHARGES,
        }
    }
}

impl GameConfig {
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_depth", self.field_depth),
            ("wall_thickness", self.wall_thickness),
            ("platform_width", self.platform_width),
            ("platform_depth", self.platform_depth),
            ("platform_speed", self.platform_speed),
            ("ball_radius", self.ball_radius),
            ("brick_depth", self.brick_depth),
            ("special_speed", self.special_speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if let Some(speed) = self.ball_speed {
            if !(speed > 0.0) {
                return Err(ConfigError::Invalid(format!("ball_speed must be positive, got {speed}")));
            }
        }
        if self.platform_width >= self.field_width {
            return Err(ConfigError::Invalid(format!(
                "platform_width {} does not fit a field of width {}",
                self.platform_width, self.field_width
            )));
        }
        if self.brick_columns == 0 {
            return Err(ConfigError::Invalid("brick_columns must be at least 1".into()));
        }
        Ok(())
    }

    /// Effective ball speed (units per tick)
    pub fn effective_ball_speed(&self) -> f32 {
        self.ball_speed.unwrap_or_else(|| self.difficulty.ball_speed())
    }

    pub fn field_half_width(&self) -> f32 {
        self.field_width / 2.0
    }

    pub fn field_half_depth(&self) -> f32 {
        self.field_depth / 2.0
    }

    /// Platform centre z (sits just beyond the near edge of the field)
    pub fn platform_z(&self) -> f32 {
        self.field_half_depth() + self.platform_height * 1.5 / 2.0
    }

    pub fn platform_y(&self) -> f32 {
        self.platform_height * 1.5 / 2.0
    }

    /// Ball centre z while attached to the platform
    pub fn ball_attach_z(&self) -> f32 {
        self.field_half_depth() - BALL_ATTACH_OFFSET
    }

    pub fn ball_y(&self) -> f32 {
        self.ball_radius + 10.0
    }

    pub fn brick_width(&self) -> f32 {
        self.field_width / self.brick_columns as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_level_clamps() {
        assert_eq!(Difficulty::from_level(0.0), Difficulty::Easy);
        assert_eq!(Difficulty::from_level(1.9), Difficulty::Easy);
        assert_eq!(Difficulty::from_level(2.0), Difficulty::Normal);
        assert_eq!(Difficulty::from_level(2.7), Difficulty::Normal);
        assert_eq!(Difficulty::from_level(3.0), Difficulty::Hard);
        assert_eq!(Difficulty::from_level(99.0), Difficulty::Hard);
        assert_eq!(Difficulty::from_level(-5.0), Difficulty::Easy);
        assert_eq!(Difficulty::from_level(f32::NAN), Difficulty::Easy);
    }

    #[test]
    fn test_level_round_trips() {
        for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert_eq!(Difficulty::from_level(difficulty.level() as f32), difficulty);
        }
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("2".parse::<Difficulty>().unwrap(), Difficulty::Normal);
        assert!(matches!(
            "insane".parse::<Difficulty>(),
            Err(ConfigError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_only_hard_has_time_limit() {
        assert_eq!(Difficulty::Easy.time_limit_secs(), None);
        assert_eq!(Difficulty::Normal.time_limit_secs(), None);
        assert_eq!(Difficulty::Hard.time_limit_secs(), Some(120));
    }

    #[test]
    fn test_default_geometry() {
        let config = GameConfig::default();
        assert_eq!(config.platform_z(), 215.0);
        assert_eq!(config.ball_attach_z(), 170.0);
        assert_eq!(config.brick_width(), 40.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "difficulty": "Hard", "platform_width": 90.0 }"#)
            .expect("valid config");
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.platform_width, 90.0);
        assert_eq!(config.field_width, FIELD_WIDTH);
        assert_eq!(config.effective_ball_speed(), 6.0);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_platform_wider_than_field_rejected() {
        let err = GameConfig::from_json(r#"{ "platform_width": 500.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_non_positive_dimension_rejected() {
        let err = GameConfig::from_json(r#"{ "ball_radius": 0.0 }"#).unwrap_err();
        assert!(err.to_string().contains("ball_radius"));
    }
}
