use std::fmt;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Default play field when the host does not derive one from its surface.
pub const DEFAULT_GRID_WIDTH: u16 = 20;
pub const DEFAULT_GRID_HEIGHT: u16 = 20;

/// Smallest accepted grid side; the starting snake and one food must fit.
pub const MIN_GRID_SIDE: u16 = 5;

pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Points granted per food.
pub const FOOD_SCORE: u32 = 10;

/// Score needed per level increase.
pub const POINTS_PER_LEVEL: u32 = 50;

pub const PARTICLE_BURST_COUNT: usize = 12;
pub const PARTICLE_LIFETIME_TICKS: u16 = 40;
pub const PARTICLE_MIN_SPEED: f32 = 3.0;
pub const PARTICLE_MAX_SPEED: f32 = 7.0;
/// Grid units travelled per tick for each unit of particle speed.
pub const PARTICLE_SPEED_SCALE: f32 = 0.1;
pub const PARTICLE_MAX_ALPHA: u8 = 255;

/// Rejected draws before food placement enumerates the free cells instead.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 256;

/// Minimum swipe displacement, in surface pixels, for touch-sized surfaces.
pub const SWIPE_THRESHOLD_PX: f32 = 50.0;

/// Minimum drag displacement, in square terminal units, for mouse swipes.
pub const TERMINAL_SWIPE_THRESHOLD: f32 = 1.5;

/// Target render cadence (~60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Named preset selecting the initial speed curve.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    #[must_use]
    pub fn speed_profile(self) -> SpeedProfile {
        match self {
            Self::Easy => SpeedProfile::new(250, 20, 100),
            Self::Medium => SpeedProfile::new(200, 20, 80),
            Self::Hard => SpeedProfile::new(160, 20, 70),
            Self::Expert => SpeedProfile::new(120, 15, 60),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
            Self::Expert => "EXPERT",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tick interval curve: starts at `base_ms`, drops by `step_ms` per level,
/// never below `min_ms`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SpeedProfile {
    pub base_ms: u64,
    pub step_ms: u64,
    pub min_ms: u64,
}

impl SpeedProfile {
    #[must_use]
    pub const fn new(base_ms: u64, step_ms: u64, min_ms: u64) -> Self {
        Self {
            base_ms,
            step_ms,
            min_ms,
        }
    }

    /// Tick interval for `level` (1-based).
    #[must_use]
    pub fn interval_for_level(self, level: u32) -> Duration {
        let penalty_ms = u64::from(level.saturating_sub(1)).saturating_mul(self.step_ms);
        let clamped_ms = self.base_ms.saturating_sub(penalty_ms).max(self.min_ms);
        Duration::from_millis(clamped_ms)
    }
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Difficulty::Medium.speed_profile()
    }
}

/// Level reached at `score`.
#[must_use]
pub fn level_for_score(score: u32) -> u32 {
    score / POINTS_PER_LEVEL + 1
}

/// Everything a session needs to know up front.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameConfig {
    pub bounds: GridSize,
    pub difficulty: Difficulty,
    pub speed: SpeedProfile,
}

impl GameConfig {
    #[must_use]
    pub fn new(bounds: GridSize, difficulty: Difficulty) -> Self {
        Self {
            bounds,
            difficulty,
            speed: difficulty.speed_profile(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(
            GridSize {
                width: DEFAULT_GRID_WIDTH,
                height: DEFAULT_GRID_HEIGHT,
            },
            Difficulty::default(),
        )
    }
}

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Color set applied to all visual elements.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Rgba,
    pub snake_head: Rgba,
    pub snake_body: Rgba,
    pub snake_glow: Rgba,
    pub snake_eye: Rgba,
    pub food: Rgba,
    pub food_inner: Rgba,
    pub food_glow: Rgba,
    pub particle_spark: Rgba,
    pub primary_light: Rgba,
    pub hud_accent: Rgba,
    pub hud_muted: Rgba,
}

/// Dark background with neon green snake and magenta food.
pub const THEME_NEON: Theme = Theme {
    background: Rgba::rgb(10, 10, 26),
    snake_head: Rgba::rgb(57, 255, 20),
    snake_body: Rgba::rgb(0, 200, 83),
    snake_glow: Rgba::rgb(118, 255, 3),
    snake_eye: Rgba::rgb(255, 255, 255),
    food: Rgba::rgb(255, 23, 68),
    food_inner: Rgba::rgb(255, 128, 171),
    food_glow: Rgba::rgb(255, 64, 129),
    particle_spark: Rgba::rgb(255, 234, 0),
    primary_light: Rgba::rgb(0, 229, 255),
    hud_accent: Rgba::rgb(0, 229, 255),
    hud_muted: Rgba::rgb(96, 96, 128),
};

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Difficulty, SpeedProfile, level_for_score};

    #[test]
    fn level_is_pure_function_of_score() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(40), 1);
        assert_eq!(level_for_score(50), 2);
        assert_eq!(level_for_score(99), 2);
        assert_eq!(level_for_score(100), 3);
    }

    #[test]
    fn medium_profile_matches_default_curve() {
        let profile = SpeedProfile::default();

        assert_eq!(profile.interval_for_level(1), Duration::from_millis(200));
        assert_eq!(profile.interval_for_level(2), Duration::from_millis(180));
        assert_eq!(profile.interval_for_level(7), Duration::from_millis(80));
        assert_eq!(profile.interval_for_level(50), Duration::from_millis(80));
    }

    #[test]
    fn interval_is_non_increasing_and_floored() {
        for difficulty in [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
        ] {
            let profile = difficulty.speed_profile();
            let mut previous = profile.interval_for_level(1);
            for level in 2..200 {
                let interval = profile.interval_for_level(level);
                assert!(interval <= previous, "{difficulty} level {level}");
                assert!(interval >= Duration::from_millis(profile.min_ms));
                previous = interval;
            }
        }
    }

    #[test]
    fn huge_level_does_not_overflow() {
        let profile = SpeedProfile::default();
        assert_eq!(
            profile.interval_for_level(u32::MAX),
            Duration::from_millis(profile.min_ms)
        );
    }
}
