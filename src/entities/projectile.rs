use crate::effects::Effect;
use crate::geometry::{Bounded, Rect, Size, Vec2};

pub const PROJECTILE_SIZE: Size = Size::new(10.0, 10.0);

/// Projectiles survive this far outside the visible world before culling.
pub const CULL_MARGIN: f32 = 200.0;

#[derive(Clone, Debug)]
pub struct Projectile {
    position: Vec2,
    velocity: Vec2,
    damage: f32,
    glyph: char,
    active: bool,
}

impl Projectile {
    pub fn new(position: Vec2, velocity: Vec2, damage: f32, glyph: char) -> Self {
        Projectile {
            position,
            velocity,
            damage,
            glyph,
            active: true,
        }
    }

    /// Integrate and cull once outside `view` (the visible world rect) plus
    /// the cull margin.
    pub fn update(&mut self, dt: f32, view: &Rect) {
        if !self.active {
            return;
        }

        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;

        if !view.expanded(CULL_MARGIN).contains(self.position) {
            self.active = false;
        }
    }

    /// Deactivate on impact. Returns the impact mark, or `None` when the
    /// projectile was already spent.
    pub fn hit(&mut self) -> Option<Effect> {
        if !self.active {
            return None;
        }
        self.active = false;
        Some(Effect::impact(self.position))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn size(&self) -> Size {
        PROJECTILE_SIZE
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }
}

impl Bounded for Projectile {
    fn bounds(&self) -> Rect {
        Rect::from_parts(self.position, PROJECTILE_SIZE)
    }
}
