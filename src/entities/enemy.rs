use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::{Bounded, Rect, Size, Vec2};

pub const ENEMY_SIZE: Size = Size::new(20.0, 20.0);

/// Horizontal pixels per frame.
const ENEMY_SPEED: f32 = 1.0;
const BOB_RATE: f32 = 0.1;
const HIT_FLASH_MS: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Basic,
    Medium,
    Advanced,
}

/// Per-kind stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProfile {
    pub glyphs: &'static [char],
    pub health: f32,
    pub damage: u32,
    pub bounce_amplitude: f32,
}

impl EnemyKind {
    /// Parse a level tag. Unknown tags are `None`; callers fall back to `Basic`.
    pub fn from_tag(tag: &str) -> Option<EnemyKind> {
        match tag {
            "basic" => Some(EnemyKind::Basic),
            "medium" => Some(EnemyKind::Medium),
            "advanced" => Some(EnemyKind::Advanced),
            _ => None,
        }
    }

    pub fn profile(&self) -> EnemyProfile {
        match self {
            EnemyKind::Basic => EnemyProfile {
                glyphs: &['Λ', 'σ', 'Σ'],
                health: 1.0,
                damage: 1,
                bounce_amplitude: 3.0,
            },
            EnemyKind::Medium => EnemyProfile {
                glyphs: &['∫', '∇', 'Φ'],
                health: 2.0,
                damage: 1,
                bounce_amplitude: 4.0,
            },
            EnemyKind::Advanced => EnemyProfile {
                glyphs: &['Ω', '∏', '∀'],
                health: 3.0,
                damage: 2,
                bounce_amplitude: 5.0,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    position: Vec2,
    kind: EnemyKind,
    health: f32,
    damage: u32,
    direction: f32,
    bounce_amplitude: f32,
    bob_phase: f32,
    glyph: char,
    flash_until_ms: Option<f64>,
    active: bool,
}

impl Enemy {
    /// Spawn an enemy, drawing its glyph from the kind's set with `rng`.
    pub fn spawn(position: Vec2, kind: EnemyKind, rng: &mut impl Rng) -> Self {
        let profile = kind.profile();
        let glyph = profile.glyphs.choose(rng).copied().unwrap_or('?');

        Enemy {
            position,
            kind,
            health: profile.health,
            damage: profile.damage,
            direction: -1.0,
            bounce_amplitude: profile.bounce_amplitude,
            bob_phase: 0.0,
            glyph,
            flash_until_ms: None,
            active: true,
        }
    }

    /// Walk and bob. Direction flips at the edges of the *viewport*
    /// (`[0, view_width - width]`), not of the level.
    pub fn update(&mut self, dt: f32, view_width: f32) {
        if !self.active {
            return;
        }

        self.bob_phase += dt * BOB_RATE;
        self.position.x += self.direction * ENEMY_SPEED * dt;

        if self.position.x < 0.0 || self.position.x > view_width - ENEMY_SIZE.width {
            self.direction = -self.direction;
        }
    }

    /// Subtract health and flash. No effect once the enemy is dead.
    pub fn take_damage(&mut self, amount: f32, now_ms: f64) {
        if !self.active {
            return;
        }

        self.health -= amount;
        self.flash_until_ms = Some(now_ms + HIT_FLASH_MS);

        if self.health <= 0.0 {
            self.active = false;
        }
    }

    pub fn is_flashing(&self, now_ms: f64) -> bool {
        self.active && self.flash_until_ms.is_some_and(|until| now_ms < until)
    }

    pub fn bob_offset(&self) -> f32 {
        self.bob_phase.sin() * self.bounce_amplitude
    }

    pub fn render_position(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.y + self.bob_offset())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn bounce_amplitude(&self) -> f32 {
        self.bounce_amplitude
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> Size {
        ENEMY_SIZE
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Rect {
        Rect::from_parts(self.position, ENEMY_SIZE)
    }
}
