//! Weapon catalog; the index is the power level.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FiringPattern {
    /// One projectile straight ahead.
    Single,
    /// Three projectiles fanning out vertically.
    Spread,
    /// Five projectiles in a line, each carrying a fifth of the damage.
    Stream,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponDefinition {
    pub name: &'static str,
    /// Glyphs drawn next to the player's body, written for a right-facing player.
    pub art: &'static str,
    /// Projectile glyphs. Spread weapons use one glyph per projectile.
    pub projectile_glyphs: &'static str,
    pub damage: f32,
    /// Frames between shots.
    pub cooldown: f32,
    /// Pixels per frame.
    pub speed: f32,
    pub pattern: FiringPattern,
}

impl WeaponDefinition {
    /// Glyph for the `index`-th projectile of a volley, falling back to the
    /// first glyph when the weapon defines fewer.
    pub fn projectile_glyph(&self, index: usize) -> char {
        self.projectile_glyphs
            .chars()
            .nth(index)
            .or_else(|| self.projectile_glyphs.chars().next())
            .unwrap_or('.')
    }
}

pub const WEAPONS: [WeaponDefinition; 5] = [
    WeaponDefinition {
        name: "Rock",
        art: ".",
        projectile_glyphs: ".",
        damage: 1.0,
        cooldown: 15.0,
        speed: 8.0,
        pattern: FiringPattern::Single,
    },
    WeaponDefinition {
        name: "Pistol",
        art: "/-",
        projectile_glyphs: ".",
        damage: 2.0,
        cooldown: 12.0,
        speed: 10.0,
        pattern: FiringPattern::Single,
    },
    WeaponDefinition {
        name: "Shotgun",
        art: "/==",
        projectile_glyphs: ".:.",
        damage: 3.0,
        cooldown: 25.0,
        speed: 9.0,
        pattern: FiringPattern::Spread,
    },
    WeaponDefinition {
        name: "Machine Gun",
        art: "/==---",
        projectile_glyphs: ".",
        damage: 5.0,
        cooldown: 5.0,
        speed: 12.0,
        pattern: FiringPattern::Stream,
    },
    WeaponDefinition {
        name: "Ray Gun",
        art: "/+=={",
        projectile_glyphs: "*",
        damage: 10.0,
        cooldown: 10.0,
        speed: 15.0,
        pattern: FiringPattern::Stream,
    },
];

pub const MAX_WEAPON_LEVEL: usize = WEAPONS.len() - 1;

/// Look up a weapon, clamping out-of-range levels to the strongest entry.
pub fn weapon(level: usize) -> &'static WeaponDefinition {
    &WEAPONS[level.min(MAX_WEAPON_LEVEL)]
}

/// Clamp an arbitrary (possibly negative) level into the catalog range.
pub fn clamp_level(level: isize) -> usize {
    level.clamp(0, MAX_WEAPON_LEVEL as isize) as usize
}

/// Mirror a right-facing glyph string for a left-facing sprite: reverse the
/// order and swap direction-sensitive characters.
pub fn mirror_art(art: &str) -> String {
    art.chars()
        .rev()
        .map(|c| match c {
            '/' => '\\',
            '\\' => '/',
            '{' => '}',
            '}' => '{',
            '(' => ')',
            ')' => '(',
            '<' => '>',
            '>' => '<',
            '[' => ']',
            ']' => '[',
            other => other,
        })
        .collect()
}
