//! Short-lived visual marks advanced by the engine clock.
//!
//! An effect outlives the entity that spawned it (a projectile is removed the
//! same tick it hits), so effects live in their own engine-owned list and are
//! dropped once finished. Nothing here schedules callbacks.

use crate::geometry::Vec2;

const IMPACT_DURATION_MS: f64 = 300.0;
const PICKUP_DURATION_MS: f64 = 1000.0;
/// Pixels the pickup text climbs over its lifetime.
const PICKUP_RISE: f32 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    /// `*` left where a projectile struck, fading out.
    Impact,
    /// `+1` floating up from a collected power-up, fading out.
    Pickup,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    kind: EffectKind,
    origin: Vec2,
    elapsed_ms: f64,
    duration_ms: f64,
}

impl Effect {
    pub fn impact(at: Vec2) -> Self {
        Effect {
            kind: EffectKind::Impact,
            origin: at,
            elapsed_ms: 0.0,
            duration_ms: IMPACT_DURATION_MS,
        }
    }

    pub fn pickup(at: Vec2) -> Self {
        Effect {
            kind: EffectKind::Pickup,
            origin: at,
            elapsed_ms: 0.0,
            duration_ms: PICKUP_DURATION_MS,
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn glyph(&self) -> &'static str {
        match self.kind {
            EffectKind::Impact => "*",
            EffectKind::Pickup => "+1",
        }
    }

    pub fn advance(&mut self, elapsed_ms: f64) {
        self.elapsed_ms = (self.elapsed_ms + elapsed_ms).min(self.duration_ms);
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Fraction of the lifetime already spent, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.elapsed_ms / self.duration_ms) as f32
    }

    /// Opacity in `[0, 1]`; 1 when spawned, 0 when finished.
    pub fn alpha(&self) -> f32 {
        1.0 - self.progress()
    }

    pub fn position(&self) -> Vec2 {
        match self.kind {
            EffectKind::Impact => self.origin,
            EffectKind::Pickup => {
                Vec2::new(self.origin.x, self.origin.y - PICKUP_RISE * self.progress())
            }
        }
    }
}
