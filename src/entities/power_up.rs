use crate::effects::Effect;
use crate::geometry::{Bounded, Rect, Size, Vec2};

pub const POWER_UP_SIZE: Size = Size::new(30.0, 30.0);

const HOVER_RATE: f32 = 0.05;
const HOVER_AMPLITUDE: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Raises the player's weapon level by `value`.
    Weapon,
}

impl PowerUpKind {
    /// Parse a level tag. Unknown tags are `None`.
    pub fn from_tag(tag: &str) -> Option<PowerUpKind> {
        match tag {
            "weapon" => Some(PowerUpKind::Weapon),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            PowerUpKind::Weapon => "weapon",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    position: Vec2,
    kind: PowerUpKind,
    value: u32,
    hover_phase: f32,
    active: bool,
}

impl PowerUp {
    pub fn new(position: Vec2, kind: PowerUpKind) -> Self {
        PowerUp {
            position,
            kind,
            value: 1,
            hover_phase: 0.0,
            active: true,
        }
    }

    /// Passive hover; affects only where the power-up is drawn.
    pub fn animate(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.hover_phase += dt * HOVER_RATE;
    }

    pub fn hover_offset(&self) -> f32 {
        self.hover_phase.sin() * HOVER_AMPLITUDE
    }

    pub fn render_position(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.y + self.hover_offset())
    }

    /// Mark collected. Returns the floating `+1`, or `None` when already taken.
    pub fn collect(&mut self) -> Option<Effect> {
        if !self.active {
            return None;
        }
        self.active = false;
        Some(Effect::pickup(self.render_position()))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> Size {
        POWER_UP_SIZE
    }

    pub fn glyph(&self) -> &'static str {
        "[+1]"
    }
}

impl Bounded for PowerUp {
    fn bounds(&self) -> Rect {
        Rect::from_parts(self.position, POWER_UP_SIZE)
    }
}
