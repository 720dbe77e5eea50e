use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Base tick interval chosen before a session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    VerySlow,
    #[default]
    Slow,
    Medium,
    Fast,
    VeryFast,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::VerySlow,
        Difficulty::Slow,
        Difficulty::Medium,
        Difficulty::Fast,
        Difficulty::VeryFast,
    ];

    /// Milliseconds between ticks at the start of a session
    pub fn base_interval_ms(&self) -> u64 {
        match self {
            Difficulty::VerySlow => 200,
            Difficulty::Slow => 150,
            Difficulty::Medium => 100,
            Difficulty::Fast => 70,
            Difficulty::VeryFast => 50,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::VerySlow => "Very slow",
            Difficulty::Slow => "Slow",
            Difficulty::Medium => "Medium",
            Difficulty::Fast => "Fast",
            Difficulty::VeryFast => "Very fast",
        }
    }
}

/// Board sizes offered by the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GridPreset {
    Small,
    Medium,
    #[default]
    Large,
}

impl GridPreset {
    pub fn tiles(&self) -> usize {
        match self {
            GridPreset::Small => 15,
            GridPreset::Medium => 20,
            GridPreset::Large => 25,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid game configuration: {0}")]
    Invalid(String),

    #[error("failed to read config file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side of the square board, in tiles
    pub grid_size: usize,
    /// Selects the starting tick interval
    pub difficulty: Difficulty,

    // Speed escalation
    /// How much the interval shrinks at each milestone
    pub speed_step_ms: u64,
    /// The interval never drops below this
    pub min_interval_ms: u64,
    /// A milestone is reached every time the score is a multiple of this
    pub points_per_speedup: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: GridPreset::default().tiles(),
            difficulty: Difficulty::default(),
            speed_step_ms: 5,
            min_interval_ms: 30,
            points_per_speedup: 3,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize, difficulty: Difficulty) -> Self {
        Self {
            grid_size,
            difficulty,
            ..Default::default()
        }
    }

    pub fn from_preset(preset: GridPreset, difficulty: Difficulty) -> Self {
        Self::new(preset.tiles(), difficulty)
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::from_preset(GridPreset::Small, Difficulty::default())
    }

    pub fn base_interval_ms(&self) -> u64 {
        self.difficulty.base_interval_ms()
    }

    /// Load a configuration from a TOML file. Missing keys keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::Invalid(format!(
                "grid_size must be at least 2, got {}",
                self.grid_size
            )));
        }

        if self.grid_size > i32::MAX as usize {
            return Err(ConfigError::Invalid(format!(
                "grid_size is too large: {}",
                self.grid_size
            )));
        }

        if self.min_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "min_interval_ms must be at least 1".to_string(),
            ));
        }

        if self.points_per_speedup == 0 {
            return Err(ConfigError::Invalid(
                "points_per_speedup must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
