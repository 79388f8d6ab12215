//! Static level layouts keyed by name.

use crate::geometry::{Bounded, Rect};

pub const PLATFORM_HEIGHT: f32 = 20.0;
pub const DEFAULT_LEVEL: &str = "test";

/// Static landing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

impl Platform {
    pub const fn new(x: f32, y: f32, width: f32) -> Self {
        Platform { x, y, width }
    }

    pub fn top(&self) -> f32 {
        self.y
    }
}

impl Bounded for Platform {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, PLATFORM_HEIGHT)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    /// Enemy kind tag (`basic`, `medium`, `advanced`).
    pub kind: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUpSpawn {
    pub x: f32,
    pub y: f32,
    /// Power-up kind tag; only `weapon` exists.
    pub kind: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelConfig {
    pub width: f32,
    pub platforms: &'static [Platform],
    pub enemies: &'static [EnemySpawn],
    pub power_ups: &'static [PowerUpSpawn],
}

const fn enemy(x: f32, y: f32, kind: &'static str) -> EnemySpawn {
    EnemySpawn { x, y, kind }
}

const fn weapon_power_up(x: f32, y: f32) -> PowerUpSpawn {
    PowerUpSpawn { x, y, kind: "weapon" }
}

// ── test ─────────────────────────────────────────────────────────────────────

pub const TEST_LEVEL: LevelConfig = LevelConfig {
    width: 2000.0,
    platforms: &[
        // ground
        Platform::new(0.0, 550.0, 2000.0),
        Platform::new(200.0, 450.0, 200.0),
        Platform::new(500.0, 450.0, 200.0),
        Platform::new(800.0, 450.0, 200.0),
        Platform::new(1100.0, 450.0, 200.0),
        Platform::new(1400.0, 450.0, 200.0),
        Platform::new(1700.0, 450.0, 200.0),
    ],
    enemies: &[
        enemy(300.0, 500.0, "basic"),
        enemy(600.0, 500.0, "basic"),
        enemy(900.0, 500.0, "medium"),
        enemy(1200.0, 500.0, "medium"),
        enemy(1500.0, 500.0, "advanced"),
    ],
    power_ups: &[
        weapon_power_up(250.0, 400.0),
        weapon_power_up(1000.0, 350.0),
        weapon_power_up(1050.0, 350.0),
        weapon_power_up(1100.0, 350.0),
        weapon_power_up(1150.0, 350.0),
        weapon_power_up(1200.0, 350.0),
    ],
};

// ── tower ────────────────────────────────────────────────────────────────────

pub const TOWER_LEVEL: LevelConfig = LevelConfig {
    width: 1200.0,
    platforms: &[
        Platform::new(0.0, 550.0, 1200.0),
        Platform::new(150.0, 460.0, 150.0),
        Platform::new(350.0, 370.0, 150.0),
        Platform::new(550.0, 280.0, 150.0),
        Platform::new(750.0, 370.0, 150.0),
        Platform::new(950.0, 460.0, 150.0),
    ],
    enemies: &[
        enemy(400.0, 500.0, "basic"),
        enemy(600.0, 250.0, "medium"),
        enemy(700.0, 500.0, "advanced"),
    ],
    power_ups: &[weapon_power_up(600.0, 220.0), weapon_power_up(1000.0, 400.0)],
};

const LEVELS: &[(&str, LevelConfig)] = &[(DEFAULT_LEVEL, TEST_LEVEL), ("tower", TOWER_LEVEL)];

/// Lookup over the static level table.
#[derive(Clone, Copy, Debug, Default)]
pub struct LevelProvider;

impl LevelProvider {
    pub fn new() -> Self {
        LevelProvider
    }

    /// The named level, or the default level for an unknown name.
    pub fn get_level(&self, name: &str) -> &'static LevelConfig {
        match LEVELS.iter().find(|(key, _)| *key == name) {
            Some((_, level)) => level,
            None => {
                tracing::warn!(
                    requested = name,
                    fallback = DEFAULT_LEVEL,
                    "unknown level, using default"
                );
                self.default_level()
            }
        }
    }

    pub fn default_level(&self) -> &'static LevelConfig {
        &LEVELS[0].1
    }

    pub fn contains(&self, name: &str) -> bool {
        LEVELS.iter().any(|(key, _)| *key == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        LEVELS.iter().map(|(key, _)| *key)
    }
}
