//! Engine tunables.

use crate::error::GameError;
use crate::geometry::{Size, Vec2};
use crate::input::{KeyBindings, ReleasePolicy};

pub const DEFAULT_VIEWPORT: Size = Size::new(800.0, 600.0);
pub const PLAYER_SPAWN: Vec2 = Vec2::new(100.0, 300.0);
pub const STARTING_LIVES: u32 = 3;
pub const INVULNERABILITY_MS: f64 = 2000.0;
pub const POWER_UP_SCORE: u32 = 100;
pub const ENEMY_KILL_SCORE: u32 = 200;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Visible area in world pixels.
    pub viewport: Size,
    pub player_spawn: Vec2,
    pub starting_lives: u32,
    /// Grace period after losing a life.
    pub invulnerability_ms: f64,
    pub power_up_score: u32,
    pub enemy_kill_score: u32,
    /// Seed for enemy glyph selection; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub key_bindings: KeyBindings,
    pub release_policy: ReleasePolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            viewport: DEFAULT_VIEWPORT,
            player_spawn: PLAYER_SPAWN,
            starting_lives: STARTING_LIVES,
            invulnerability_ms: INVULNERABILITY_MS,
            power_up_score: POWER_UP_SCORE,
            enemy_kill_score: ENEMY_KILL_SCORE,
            seed: None,
            key_bindings: KeyBindings::default(),
            release_policy: ReleasePolicy::default(),
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "viewport must be positive, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if self.starting_lives == 0 {
            return Err(GameError::InvalidConfig(
                "starting_lives must be at least 1".to_string(),
            ));
        }
        if self.invulnerability_ms.is_nan() || self.invulnerability_ms < 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "invulnerability_ms must be non-negative, got {}",
                self.invulnerability_ms
            )));
        }
        if let ReleasePolicy::HoldWindow(0) = self.release_policy {
            return Err(GameError::InvalidConfig(
                "hold window must span at least one tick".to_string(),
            ));
        }
        Ok(())
    }
}
