use crate::entities::projectile::{Projectile, PROJECTILE_SIZE};
use crate::geometry::{Bounded, Rect, Size, Vec2};
use crate::input::GameInput;
use crate::weapons::{self, FiringPattern, WeaponDefinition};

pub const PLAYER_SIZE: Size = Size::new(30.0, 60.0);

/// Width of one monospace glyph cell in world pixels.
pub const GLYPH_WIDTH: f32 = 10.0;

// All rates are per 60 Hz frame.
const RUN_SPEED: f32 = 5.0;
const JUMP_VELOCITY: f32 = -15.0;
const GRAVITY: f32 = 0.8;
const KNOCKBACK_X: f32 = 10.0;
const KNOCKBACK_Y: f32 = -5.0;

const BLINK_PERIOD_MS: f64 = 100.0;

const SPREAD_OFFSETS: [f32; 3] = [-5.0, 0.0, 5.0];
const SPREAD_RISE: [f32; 3] = [-1.0, 0.0, 1.0];
const STREAM_COUNT: usize = 5;
const STREAM_SPACING: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Visibility toggling while invulnerable.
#[derive(Clone, Copy, Debug)]
struct Blink {
    next_toggle_ms: f64,
}

#[derive(Clone, Debug)]
pub struct Player {
    position: Vec2,
    velocity: Vec2,
    jumping: bool,
    /// Jump was held on the previous update; a new jump needs a fresh press.
    jump_held: bool,
    weapon_level: usize,
    shoot_cooldown: f32,
    facing: Facing,
    invulnerable_until_ms: f64,
    blink: Option<Blink>,
    visible: bool,
    active: bool,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Player {
            position,
            velocity: Vec2::default(),
            jumping: false,
            jump_held: false,
            weapon_level: 0,
            shoot_cooldown: 0.0,
            facing: Facing::Right,
            invulnerable_until_ms: 0.0,
            blink: None,
            visible: true,
            active: true,
        }
    }

    /// Advance one tick. Returns the projectiles fired this tick; the caller
    /// owns them from here on.
    pub fn update(&mut self, dt: f32, input: &GameInput) -> Vec<Projectile> {
        if !self.active {
            return Vec::new();
        }

        self.velocity.x = 0.0;
        if input.left {
            self.velocity.x = -RUN_SPEED;
            self.facing = Facing::Left;
        }
        if input.right {
            self.velocity.x = RUN_SPEED;
            self.facing = Facing::Right;
        }

        if input.jump && !self.jump_held && !self.jumping {
            self.velocity.y = JUMP_VELOCITY;
            self.jumping = true;
        }
        self.jump_held = input.jump;

        self.velocity.y += GRAVITY * dt;

        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;

        if self.shoot_cooldown > 0.0 {
            self.shoot_cooldown -= dt;
        }

        if input.shoot && self.can_shoot() {
            self.shoot()
        } else {
            Vec::new()
        }
    }

    /// Teleport to `position` at rest.
    pub fn place(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::default();
    }

    /// Rest the feet exactly on `surface_y`.
    pub fn land(&mut self, surface_y: f32) {
        self.position.y = surface_y - PLAYER_SIZE.height;
        self.velocity.y = 0.0;
        self.jumping = false;
    }

    pub fn can_shoot(&self) -> bool {
        self.shoot_cooldown <= 0.0
    }

    /// Fire the current weapon, resetting the cooldown.
    pub fn shoot(&mut self) -> Vec<Projectile> {
        let weapon = self.weapon();
        self.shoot_cooldown = weapon.cooldown;

        let dir = self.facing.sign();
        let tip = self.weapon_tip();
        let velocity = Vec2::new(weapon.speed * dir, 0.0);

        match weapon.pattern {
            FiringPattern::Single => vec![Projectile::new(
                tip,
                velocity,
                weapon.damage,
                weapon.projectile_glyph(0),
            )],
            FiringPattern::Spread => SPREAD_OFFSETS
                .iter()
                .zip(SPREAD_RISE.iter())
                .enumerate()
                .map(|(i, (offset, rise))| {
                    Projectile::new(
                        Vec2::new(tip.x, tip.y + offset),
                        Vec2::new(velocity.x, rise * dir),
                        weapon.damage,
                        weapon.projectile_glyph(i),
                    )
                })
                .collect(),
            FiringPattern::Stream => (0..STREAM_COUNT)
                .map(|i| {
                    Projectile::new(
                        Vec2::new(tip.x + i as f32 * STREAM_SPACING * dir, tip.y),
                        velocity,
                        weapon.damage / STREAM_COUNT as f32,
                        weapon.projectile_glyph(0),
                    )
                })
                .collect(),
        }
    }

    /// Where projectiles leave the barrel: just past the end of the weapon
    /// art, on whichever side the player faces, at mid-body height.
    pub fn weapon_tip(&self) -> Vec2 {
        let art_width = self.weapon().art.chars().count() as f32 * GLYPH_WIDTH;
        let y = self.position.y + PLAYER_SIZE.height / 2.0;
        match self.facing {
            Facing::Right => Vec2::new(self.position.x + PLAYER_SIZE.width + art_width, y),
            Facing::Left => Vec2::new(self.position.x - art_width - PROJECTILE_SIZE.width, y),
        }
    }

    /// Weapon glyphs as drawn beside the body, mirrored when facing left.
    pub fn weapon_art(&self) -> String {
        let art = self.weapon().art;
        match self.facing {
            Facing::Right => art.to_string(),
            Facing::Left => weapons::mirror_art(art),
        }
    }

    pub fn weapon(&self) -> &'static WeaponDefinition {
        weapons::weapon(self.weapon_level)
    }

    pub fn weapon_level(&self) -> usize {
        self.weapon_level
    }

    /// Set the weapon level, clamped into the catalog range.
    pub fn set_weapon_level(&mut self, level: isize) {
        self.weapon_level = weapons::clamp_level(level);
    }

    /// Become immune to life damage until `now_ms + duration_ms` and start
    /// blinking. Calling again while blinking only extends the deadline.
    pub fn set_invulnerable(&mut self, duration_ms: f64, now_ms: f64) {
        self.invulnerable_until_ms = now_ms + duration_ms;
        if self.blink.is_none() {
            self.blink = Some(Blink {
                next_toggle_ms: now_ms + BLINK_PERIOD_MS,
            });
        }
    }

    pub fn is_invulnerable(&self, now_ms: f64) -> bool {
        now_ms < self.invulnerable_until_ms
    }

    /// Run every blink toggle due by `now_ms`. The blink ends on the first
    /// toggle past the invulnerability deadline, leaving the player visible.
    pub fn advance_blink(&mut self, now_ms: f64) {
        while let Some(blink) = self.blink.as_mut() {
            if now_ms < blink.next_toggle_ms {
                break;
            }
            let toggle_at = blink.next_toggle_ms;
            blink.next_toggle_ms += BLINK_PERIOD_MS;
            self.visible = !self.visible;

            if toggle_at > self.invulnerable_until_ms {
                self.blink = None;
                self.visible = true;
            }
        }
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.is_some()
    }

    /// Shove away from `from` horizontally with a small hop. Overrides the
    /// current velocity.
    pub fn apply_knockback(&mut self, from: Vec2) {
        let direction = if self.position.x < from.x { -1.0 } else { 1.0 };
        self.velocity.x = direction * KNOCKBACK_X;
        self.velocity.y = KNOCKBACK_Y;
    }

    /// Tear down: cancel the blink and stop simulating.
    pub fn destroy(&mut self) {
        self.blink = None;
        self.visible = true;
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn shoot_cooldown(&self) -> f32 {
        self.shoot_cooldown
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn size(&self) -> Size {
        PLAYER_SIZE
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Rect {
        Rect::from_parts(self.position, PLAYER_SIZE)
    }
}
