//! The game engine: owns every entity and runs the per-tick update.
//!
//! Entities only know how to move themselves. Everything that involves two
//! of them (landing, combat, pickups) and every change the host needs to
//! hear about (score, lives, weapon, game over) happens here, in a fixed
//! order each tick.

use std::sync::mpsc::Sender;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collision::CollisionResolver;
use crate::config::GameConfig;
use crate::effects::Effect;
use crate::entities::{Enemy, EnemyKind, Player, PowerUp, PowerUpKind, Projectile};
use crate::error::GameError;
use crate::geometry::{Bounded, Rect, Size, Vec2};
use crate::input::InputSource;
use crate::levels::{LevelProvider, Platform, DEFAULT_LEVEL};
use crate::ticker::{self, dt_to_millis};

// ── Host notifications ───────────────────────────────────────────────────────

/// Receives state changes synchronously, at the point each one happens.
pub trait GameCallbacks {
    fn on_score_change(&mut self, _score: u32) {}
    fn on_life_change(&mut self, _lives: u32) {}
    fn on_weapon_change(&mut self, _weapon_level: usize) {}
    fn on_game_over(&mut self) {}
}

/// Callbacks that ignore everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCallbacks;

impl GameCallbacks for NoCallbacks {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged(u32),
    LivesChanged(u32),
    WeaponChanged(usize),
    GameOver,
}

/// Forward every notification down a channel. A dropped receiver is ignored.
impl GameCallbacks for Sender<GameEvent> {
    fn on_score_change(&mut self, score: u32) {
        let _ = self.send(GameEvent::ScoreChanged(score));
    }

    fn on_life_change(&mut self, lives: u32) {
        let _ = self.send(GameEvent::LivesChanged(lives));
    }

    fn on_weapon_change(&mut self, weapon_level: usize) {
        let _ = self.send(GameEvent::WeaponChanged(weapon_level));
    }

    fn on_game_over(&mut self) {
        let _ = self.send(GameEvent::GameOver);
    }
}

// ── Engine ───────────────────────────────────────────────────────────────────

pub struct GameEngine {
    config: GameConfig,
    levels: LevelProvider,
    collisions: CollisionResolver,
    input: InputSource,
    callbacks: Box<dyn GameCallbacks>,
    rng: StdRng,

    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    power_ups: Vec<PowerUp>,
    platforms: Vec<Platform>,
    effects: Vec<Effect>,

    level_name: String,
    level_width: f32,
    score: u32,
    lives: u32,
    paused: bool,
    game_over: bool,
    /// Whether the engine still accepts ticks; cleared for good by `destroy`.
    attached: bool,
    camera_x: f32,
    clock_ms: f64,
    frame: u64,
}

impl GameEngine {
    pub fn new(
        config: GameConfig,
        callbacks: impl GameCallbacks + 'static,
    ) -> Result<Self, GameError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let levels = LevelProvider::new();

        Ok(GameEngine {
            input: InputSource::new(config.key_bindings.clone(), config.release_policy),
            player: Player::new(config.player_spawn),
            lives: config.starting_lives,
            level_width: levels.default_level().width,
            levels,
            collisions: CollisionResolver::new(),
            callbacks: Box::new(callbacks),
            rng,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            power_ups: Vec::new(),
            platforms: Vec::new(),
            effects: Vec::new(),
            level_name: DEFAULT_LEVEL.to_string(),
            score: 0,
            paused: false,
            game_over: false,
            attached: true,
            camera_x: 0.0,
            clock_ms: 0.0,
            frame: 0,
            config,
        })
    }

    // ── Level lifecycle ──────────────────────────────────────────────────────

    /// Replace the current level. Unknown names load the default level.
    pub fn load_level(&mut self, name: &str) {
        self.clear_level();

        let level = self.levels.get_level(name);
        self.level_name = if self.levels.contains(name) {
            name.to_string()
        } else {
            DEFAULT_LEVEL.to_string()
        };
        self.level_width = level.width;
        self.platforms.extend_from_slice(level.platforms);

        for spawn in level.enemies {
            let kind = EnemyKind::from_tag(spawn.kind).unwrap_or_else(|| {
                tracing::warn!(tag = spawn.kind, "unknown enemy type, spawning basic");
                EnemyKind::Basic
            });
            self.spawn_enemy(Vec2::new(spawn.x, spawn.y), kind);
        }
        for spawn in level.power_ups {
            let kind = PowerUpKind::from_tag(spawn.kind).unwrap_or_else(|| {
                tracing::warn!(tag = spawn.kind, "unknown power-up type, spawning weapon");
                PowerUpKind::Weapon
            });
            self.spawn_power_up(Vec2::new(spawn.x, spawn.y), kind);
        }

        tracing::info!(
            name = %self.level_name,
            platforms = self.platforms.len(),
            enemies = self.enemies.len(),
            power_ups = self.power_ups.len(),
            "level loaded"
        );
    }

    /// Start a fresh run: full lives, zero score, starting weapon, player
    /// back at the spawn point.
    pub fn new_game(&mut self, level: &str) {
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.game_over = false;
        self.camera_x = 0.0;
        self.player = Player::new(self.config.player_spawn);

        self.callbacks.on_score_change(self.score);
        self.callbacks.on_life_change(self.lives);
        self.callbacks.on_weapon_change(self.player.weapon_level());

        tracing::info!(name = level, "new game");
        self.load_level(level);
        self.start();
    }

    pub fn spawn_enemy(&mut self, position: Vec2, kind: EnemyKind) {
        let enemy = Enemy::spawn(position, kind, &mut self.rng);
        self.enemies.push(enemy);
    }

    pub fn spawn_power_up(&mut self, position: Vec2, kind: PowerUpKind) {
        self.power_ups.push(PowerUp::new(position, kind));
    }

    fn clear_level(&mut self) {
        self.enemies.clear();
        self.power_ups.clear();
        self.projectiles.clear();
        self.platforms.clear();
        self.effects.clear();
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    /// Advance the simulation by `dt` frame units. Does nothing while paused,
    /// after game over, or once destroyed.
    pub fn update(&mut self, dt: f32) {
        if !self.attached || self.paused || self.game_over {
            return;
        }

        self.frame += 1;
        self.clock_ms += dt_to_millis(dt);
        let now = self.clock_ms;

        // 1. Input
        let input = self.input.snapshot();

        // 2. Land on whatever the previous tick fell onto
        self.check_platform_collisions();

        // 3. Player
        let fired = self.player.update(dt, &input);
        self.projectiles.extend(fired);

        // 4. Enemies
        let view_width = self.config.viewport.width;
        for enemy in &mut self.enemies {
            enemy.update(dt, view_width);
        }

        // 5. Projectiles
        let view = self.view_rect();
        for projectile in &mut self.projectiles {
            projectile.update(dt, &view);
        }

        // 6. Combat and pickups
        self.handle_collisions(now);

        // 7. Cleanup
        self.cleanup_entities();
        self.advance_effects(dt, now);

        // 8. Camera
        self.update_camera();

        tracing::trace!(
            frame = self.frame,
            enemies = self.enemies.len(),
            projectiles = self.projectiles.len(),
            power_ups = self.power_ups.len(),
            "tick"
        );
    }

    /// Advance by a host frame of any length, one `update` per sub-step of
    /// at most `ticker::MAX_STEP`. Long frames would otherwise carry a
    /// falling player through a platform in a single step.
    pub fn advance(&mut self, dt: f32) {
        for step in ticker::substeps(dt) {
            self.update(step);
        }
    }

    /// Feet-only, falling-only. The first matching platform wins, so the
    /// order platforms are declared in matters where they overlap.
    fn check_platform_collisions(&mut self) {
        if self.player.velocity().y <= 0.0 {
            return;
        }

        let body = self.player.bounds();
        let feet = body.bottom();

        for platform in &self.platforms {
            let surface = platform.bounds();
            if body.right() > surface.x
                && body.x < surface.right()
                && feet >= surface.y
                && feet <= surface.bottom()
            {
                self.player.land(platform.top());
                break;
            }
        }
    }

    fn handle_collisions(&mut self, now: f64) {
        // ── Player ↔ enemies ─────────────────────────────────────────────────
        for enemy in &self.enemies {
            if !self.collisions.check_collision(&self.player, enemy) {
                continue;
            }
            if !enemy.is_active() || self.player.is_invulnerable(now) {
                continue;
            }

            self.lives = self.lives.saturating_sub(1);
            tracing::debug!(lives = self.lives, "player hit");
            self.callbacks.on_life_change(self.lives);

            if self.lives == 0 {
                self.game_over = true;
                tracing::info!(score = self.score, "game over");
                self.callbacks.on_game_over();
                return;
            }

            self.player.set_invulnerable(self.config.invulnerability_ms, now);
            self.player.apply_knockback(enemy.position());
        }

        // ── Player ↔ power-ups ───────────────────────────────────────────────
        for power_up in &mut self.power_ups {
            if !power_up.is_active() || !self.collisions.check_collision(&self.player, &*power_up) {
                continue;
            }

            match power_up.kind() {
                PowerUpKind::Weapon => {
                    let next = self.player.weapon_level() as isize + power_up.value() as isize;
                    self.player.set_weapon_level(next);
                    tracing::debug!(weapon_level = self.player.weapon_level(), "weapon upgraded");
                    self.callbacks.on_weapon_change(self.player.weapon_level());
                }
            }

            if let Some(effect) = power_up.collect() {
                self.effects.push(effect);
            }
            self.score += self.config.power_up_score;
            self.callbacks.on_score_change(self.score);
        }

        // ── Projectiles ↔ enemies ────────────────────────────────────────────
        for projectile in &mut self.projectiles {
            for enemy in &mut self.enemies {
                if !projectile.is_active() || !enemy.is_active() {
                    continue;
                }
                if !self.collisions.check_collision(&*projectile, &*enemy) {
                    continue;
                }

                enemy.take_damage(projectile.damage(), now);
                if let Some(effect) = projectile.hit() {
                    self.effects.push(effect);
                }

                if !enemy.is_active() {
                    self.score += self.config.enemy_kill_score;
                    self.callbacks.on_score_change(self.score);
                }
            }
        }
    }

    fn cleanup_entities(&mut self) {
        self.projectiles.retain(Projectile::is_active);
        self.enemies.retain(Enemy::is_active);
        self.power_ups.retain(PowerUp::is_active);
    }

    /// Clock-driven visuals: player blink, power-up hover, impact and pickup
    /// marks.
    fn advance_effects(&mut self, dt: f32, now: f64) {
        self.player.advance_blink(now);

        for power_up in &mut self.power_ups {
            power_up.animate(dt);
        }

        let elapsed = dt_to_millis(dt);
        for effect in &mut self.effects {
            effect.advance(elapsed);
        }
        self.effects.retain(|effect| !effect.is_finished());
    }

    /// Keep the player centred once past half a screen, stopping half a
    /// screen before the end of the level.
    fn update_camera(&mut self) {
        let half_width = self.config.viewport.width / 2.0;
        let player_x = self.player.position().x;

        if player_x > half_width && player_x < self.level_width - half_width {
            self.camera_x = player_x - half_width;
        }
    }

    // ── Run state ────────────────────────────────────────────────────────────

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn start(&mut self) {
        self.paused = false;
    }

    /// Detach from the tick source and release everything. Idempotent.
    pub fn destroy(&mut self) {
        if self.attached {
            tracing::debug!(frame = self.frame, "engine destroyed");
        }
        self.attached = false;
        self.clear_level();
        self.player.destroy();
        self.input.destroy();
    }

    // ── Read-only views ──────────────────────────────────────────────────────

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Direct player access for hosts that reposition it (e.g. debug tools).
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn input_mut(&mut self) -> &mut InputSource {
        &mut self.input
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    pub fn level_width(&self) -> f32 {
        self.level_width
    }

    pub fn viewport(&self) -> Size {
        self.config.viewport
    }

    /// World x of the left screen edge.
    pub fn camera_x(&self) -> f32 {
        self.camera_x
    }

    /// The world rectangle currently on screen.
    pub fn view_rect(&self) -> Rect {
        Rect::new(
            self.camera_x,
            0.0,
            self.config.viewport.width,
            self.config.viewport.height,
        )
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Drop for GameEngine {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_platforms(platforms: &[Platform]) -> GameEngine {
        let mut engine = GameEngine::new(GameConfig::default().with_seed(3), NoCallbacks)
            .expect("default config is valid");
        engine.platforms.extend_from_slice(platforms);
        // Feet at 411.8 after one falling tick: inside both landing bands.
        engine.player_mut().place(Vec2::new(50.0, 351.0));
        engine.update(1.0);
        engine
    }

    #[test]
    fn first_declared_platform_wins_overlap() {
        let mut engine = engine_with_platforms(&[
            Platform::new(0.0, 400.0, 200.0),
            Platform::new(0.0, 410.0, 200.0),
        ]);

        engine.update(1.0);

        // Landed on 400 (y = 340), then one frame of gravity.
        assert!((engine.player().position().y - 340.8).abs() < 1e-3);
        assert!(!engine.player().is_jumping());
    }

    #[test]
    fn declaration_order_decides_not_height() {
        let mut engine = engine_with_platforms(&[
            Platform::new(0.0, 410.0, 200.0),
            Platform::new(0.0, 400.0, 200.0),
        ]);

        engine.update(1.0);

        assert!((engine.player().position().y - 350.8).abs() < 1e-3);
    }
}
