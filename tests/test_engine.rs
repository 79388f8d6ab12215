use std::sync::mpsc::{self, Receiver};

use ascii_man::effects::EffectKind;
use ascii_man::entities::{EnemyKind, PowerUpKind};
use ascii_man::geometry::{Size, Vec2};
use ascii_man::input::ReleasePolicy;
use ascii_man::ticker::millis_to_dt;
use ascii_man::weapons::MAX_WEAPON_LEVEL;
use ascii_man::*;

use crossterm::event::KeyCode;

const EPS: f32 = 1e-3;

fn make_engine() -> (GameEngine, Receiver<GameEvent>) {
    make_engine_with(GameConfig::default().with_seed(42))
}

fn make_engine_with(config: GameConfig) -> (GameEngine, Receiver<GameEvent>) {
    let (tx, rx) = mpsc::channel();
    let engine = GameEngine::new(config, tx).expect("valid config");
    (engine, rx)
}

fn drain(rx: &Receiver<GameEvent>) -> Vec<GameEvent> {
    rx.try_iter().collect()
}

fn tick(engine: &mut GameEngine, n: usize) {
    for _ in 0..n {
        engine.update(1.0);
    }
}

// ── Construction & config ─────────────────────────────────────────────────────

#[test]
fn new_engine_starts_empty() {
    let (engine, rx) = make_engine();
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.lives(), 3);
    assert!(engine.enemies().is_empty());
    assert!(engine.platforms().is_empty());
    assert_eq!(engine.player().position(), Vec2::new(100.0, 300.0));
    assert!(drain(&rx).is_empty());
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = GameConfig::default();
    config.viewport = Size::new(0.0, 600.0);
    let err = GameEngine::new(config, NoCallbacks).err().expect("zero viewport");
    assert!(matches!(err, GameError::InvalidConfig(_)));

    let mut config = GameConfig::default();
    config.starting_lives = 0;
    assert!(config.validate().is_err());

    let mut config = GameConfig::default();
    config.release_policy = ReleasePolicy::HoldWindow(0);
    assert!(config.validate().is_err());
}

#[test]
fn dropped_receiver_is_harmless() {
    let (mut engine, rx) = make_engine();
    drop(rx);
    engine.spawn_power_up(Vec2::new(100.0, 300.0), PowerUpKind::Weapon);
    engine.update(1.0);
    assert_eq!(engine.score(), 100);
}

// ── Levels ────────────────────────────────────────────────────────────────────

#[test]
fn load_test_level_spawns_in_declared_order() {
    let (mut engine, _rx) = make_engine();
    engine.load_level("test");

    assert_eq!(engine.level_name(), "test");
    assert_eq!(engine.platforms().len(), 7);
    assert_eq!(engine.enemies().len(), 5);
    assert_eq!(engine.power_ups().len(), 6);

    let xs: Vec<f32> = engine.enemies().iter().map(|e| e.position().x).collect();
    assert_eq!(xs, [300.0, 600.0, 900.0, 1200.0, 1500.0]);
    let kinds: Vec<EnemyKind> = engine.enemies().iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        [
            EnemyKind::Basic,
            EnemyKind::Basic,
            EnemyKind::Medium,
            EnemyKind::Medium,
            EnemyKind::Advanced
        ]
    );
    let first = engine.power_ups()[0].position();
    assert_eq!(first, Vec2::new(250.0, 400.0));
}

#[test]
fn unknown_level_loads_default() {
    let (mut engine, _rx) = make_engine();
    engine.load_level("does-not-exist");
    assert_eq!(engine.level_name(), "test");
    assert_eq!(engine.platforms().len(), 7);
}

#[test]
fn reloading_replaces_previous_level() {
    let (mut engine, _rx) = make_engine();
    engine.load_level("test");
    engine.load_level("tower");

    assert_eq!(engine.level_name(), "tower");
    assert_eq!(engine.level_width(), 1200.0);
    assert_eq!(engine.platforms().len(), 6);
    assert_eq!(engine.enemies().len(), 3);
    assert_eq!(engine.power_ups().len(), 2);
}

#[test]
fn same_seed_same_glyphs() {
    let (mut a, _ra) = make_engine();
    let (mut b, _rb) = make_engine();
    a.load_level("test");
    b.load_level("test");
    let ga: Vec<char> = a.enemies().iter().map(|e| e.glyph()).collect();
    let gb: Vec<char> = b.enemies().iter().map(|e| e.glyph()).collect();
    assert_eq!(ga, gb);
}

#[test]
fn new_game_resets_and_reports() {
    let (mut engine, rx) = make_engine();
    engine.spawn_power_up(Vec2::new(100.0, 300.0), PowerUpKind::Weapon);
    engine.update(1.0);
    assert_eq!(engine.score(), 100);
    drain(&rx);

    engine.new_game("tower");

    assert_eq!(engine.score(), 0);
    assert_eq!(engine.lives(), 3);
    assert_eq!(engine.player().weapon_level(), 0);
    assert_eq!(engine.level_name(), "tower");
    assert!(!engine.is_paused());
    assert_eq!(
        drain(&rx),
        [
            GameEvent::ScoreChanged(0),
            GameEvent::LivesChanged(3),
            GameEvent::WeaponChanged(0)
        ]
    );
}

// ── Tick: movement & landing ──────────────────────────────────────────────────

#[test]
fn jump_from_spawn() {
    let (mut engine, _rx) = make_engine();

    engine.input_mut().key_down(KeyCode::Char(' '));
    engine.update(1.0);
    engine.input_mut().key_up(KeyCode::Char(' '));

    let vy = engine.player().velocity().y;
    assert!(vy < 0.0);
    assert!(engine.player().is_jumping());

    let mut prev_vy = vy;
    let mut prev_y = engine.player().position().y;
    for _ in 0..40 {
        engine.update(1.0);
        let vy = engine.player().velocity().y;
        let y = engine.player().position().y;
        assert!(vy > prev_vy);
        if vy > 0.0 {
            assert!(y > prev_y);
        }
        prev_vy = vy;
        prev_y = y;
    }
    assert!(prev_vy > 0.0);
}

#[test]
fn player_falls_onto_ground() {
    let (mut engine, _rx) = make_engine();
    engine.load_level("test");

    tick(&mut engine, 100);

    let player = engine.player();
    assert!(!player.is_jumping());
    // Landing snaps the feet to 550; one frame of gravity follows.
    assert!((player.position().y - 490.8).abs() < EPS);
    assert!((player.velocity().y - 0.8).abs() < EPS);
}

#[test]
fn player_lands_at_30_fps_host_rate() {
    let (mut engine, _rx) = make_engine();
    engine.load_level("test");
    let dt = millis_to_dt(1000.0 / 30.0);

    // Two seconds of host frames; the first enemy is still well clear.
    for _ in 0..60 {
        engine.advance(dt);
    }

    let player = engine.player();
    let feet = player.position().y + player.size().height;
    assert!(!player.is_jumping());
    assert!((feet - 550.0).abs() < 1.0, "feet at {feet}");
    assert_eq!(engine.lives(), 3);
}

#[test]
fn long_frame_runs_one_update_per_step() {
    let (mut engine, _rx) = make_engine();
    engine.advance(2.5);
    assert_eq!(engine.frame(), 3);
    assert!((engine.clock_ms() - 2.5 * 1000.0 / 60.0).abs() < 1e-3);
}

#[test]
fn rising_player_passes_through_platforms() {
    let (mut engine, _rx) = make_engine();
    engine.load_level("test");
    // Feet inside the ground band, moving up.
    engine.player_mut().place(Vec2::new(100.0, 495.0));
    engine.input_mut().key_down(KeyCode::Char(' '));

    engine.update(1.0);

    assert!(engine.player().velocity().y < 0.0);
    assert!(engine.player().position().y < 495.0);
}

#[test]
fn camera_follows_player_inside_level() {
    let (mut engine, _rx) = make_engine();

    engine.player_mut().place(Vec2::new(600.0, 300.0));
    engine.update(1.0);
    assert_eq!(engine.camera_x(), 200.0);
    assert_eq!(engine.view_rect().x, 200.0);

    // Near the level end the camera holds still.
    engine.player_mut().place(Vec2::new(1700.0, 300.0));
    engine.update(1.0);
    assert_eq!(engine.camera_x(), 200.0);
}

#[test]
fn camera_waits_for_half_screen() {
    let (mut engine, _rx) = make_engine();
    engine.player_mut().place(Vec2::new(300.0, 300.0));
    engine.update(1.0);
    assert_eq!(engine.camera_x(), 0.0);
}

#[test]
fn clock_advances_in_frame_units() {
    let (mut engine, _rx) = make_engine();
    tick(&mut engine, 3);
    assert_eq!(engine.frame(), 3);
    assert!((engine.clock_ms() - 50.0).abs() < 1e-6);
}

// ── Tick: player ↔ enemy ──────────────────────────────────────────────────────

#[test]
fn enemy_contact_costs_one_life() {
    let (mut engine, rx) = make_engine();
    engine.spawn_enemy(Vec2::new(105.0, 310.0), EnemyKind::Advanced);

    engine.update(1.0);

    assert_eq!(engine.lives(), 2);
    assert_eq!(drain(&rx), [GameEvent::LivesChanged(2)]);
    assert!(engine.player().is_invulnerable(engine.clock_ms()));
    assert_eq!(engine.player().velocity(), Vec2::new(-10.0, -5.0));
}

#[test]
fn invulnerable_player_ignores_contact() {
    let (mut engine, rx) = make_engine();
    engine.spawn_enemy(Vec2::new(105.0, 310.0), EnemyKind::Basic);

    engine.update(1.0);
    drain(&rx);

    // Still overlapping on the next ticks, but within the grace period.
    tick(&mut engine, 5);
    assert_eq!(engine.lives(), 2);
    assert!(drain(&rx).is_empty());
}

#[test]
fn contact_during_grace_period_set_by_host() {
    let (mut engine, rx) = make_engine();
    let now = engine.clock_ms();
    engine.player_mut().set_invulnerable(5000.0, now);
    engine.spawn_enemy(Vec2::new(105.0, 310.0), EnemyKind::Basic);

    engine.update(1.0);

    assert_eq!(engine.lives(), 3);
    assert!(drain(&rx).is_empty());
}

#[test]
fn two_enemies_same_tick_cost_one_life() {
    let (mut engine, rx) = make_engine();
    engine.spawn_enemy(Vec2::new(105.0, 310.0), EnemyKind::Basic);
    engine.spawn_enemy(Vec2::new(110.0, 320.0), EnemyKind::Basic);

    engine.update(1.0);

    assert_eq!(engine.lives(), 2);
    assert_eq!(drain(&rx), [GameEvent::LivesChanged(2)]);
}

#[test]
fn last_life_ends_game_once() {
    let mut config = GameConfig::default().with_seed(1);
    config.starting_lives = 1;
    let (mut engine, rx) = make_engine_with(config);
    engine.spawn_enemy(Vec2::new(105.0, 310.0), EnemyKind::Basic);
    engine.spawn_enemy(Vec2::new(110.0, 320.0), EnemyKind::Basic);

    engine.update(1.0);

    assert!(engine.is_game_over());
    assert_eq!(engine.lives(), 0);
    assert_eq!(drain(&rx), [GameEvent::LivesChanged(0), GameEvent::GameOver]);

    let frame = engine.frame();
    tick(&mut engine, 10);
    assert_eq!(engine.frame(), frame);
    assert!(drain(&rx).is_empty());
}

#[test]
fn blink_runs_during_grace_period() {
    let (mut engine, _rx) = make_engine();
    engine.spawn_enemy(Vec2::new(105.0, 310.0), EnemyKind::Basic);
    engine.update(1.0);
    assert!(engine.player().is_blinking());

    // Just over 100 ms after the hit the player is hidden.
    tick(&mut engine, 7);
    assert!(!engine.player().is_visible());

    // Well past the 2 s deadline the blink is over.
    tick(&mut engine, 200);
    assert!(!engine.player().is_blinking());
    assert!(engine.player().is_visible());
}

// ── Tick: pickups ─────────────────────────────────────────────────────────────

#[test]
fn power_up_upgrades_weapon_and_scores() {
    let (mut engine, rx) = make_engine();
    engine.spawn_power_up(Vec2::new(100.0, 300.0), PowerUpKind::Weapon);

    engine.update(1.0);

    assert_eq!(engine.player().weapon_level(), 1);
    assert_eq!(engine.score(), 100);
    assert_eq!(
        drain(&rx),
        [GameEvent::WeaponChanged(1), GameEvent::ScoreChanged(100)]
    );
    assert!(engine.power_ups().is_empty());
    assert_eq!(engine.effects().len(), 1);
    assert_eq!(engine.effects()[0].kind(), EffectKind::Pickup);
}

#[test]
fn power_up_at_max_level_still_reports() {
    let (mut engine, rx) = make_engine();
    engine.player_mut().set_weapon_level(MAX_WEAPON_LEVEL as isize);
    engine.spawn_power_up(Vec2::new(100.0, 300.0), PowerUpKind::Weapon);

    engine.update(1.0);

    assert_eq!(engine.player().weapon_level(), MAX_WEAPON_LEVEL);
    assert_eq!(
        drain(&rx),
        [
            GameEvent::WeaponChanged(MAX_WEAPON_LEVEL),
            GameEvent::ScoreChanged(100)
        ]
    );
}

#[test]
fn pickup_effect_expires_after_a_second() {
    let (mut engine, _rx) = make_engine();
    engine.spawn_power_up(Vec2::new(100.0, 300.0), PowerUpKind::Weapon);
    engine.update(1.0);
    assert_eq!(engine.effects().len(), 1);

    tick(&mut engine, 60);
    assert!(engine.effects().is_empty());
}

// ── Tick: projectiles ─────────────────────────────────────────────────────────

#[test]
fn projectile_kills_basic_enemy() {
    let (mut engine, rx) = make_engine();
    engine.spawn_enemy(Vec2::new(150.0, 325.0), EnemyKind::Basic);
    engine.input_mut().key_down(KeyCode::Char('z'));

    engine.update(1.0);

    assert!(engine.enemies().is_empty());
    assert!(engine.projectiles().is_empty());
    assert_eq!(engine.score(), 200);
    assert_eq!(drain(&rx), [GameEvent::ScoreChanged(200)]);
    assert_eq!(engine.effects()[0].kind(), EffectKind::Impact);
}

#[test]
fn wounded_enemy_survives_and_flashes() {
    let (mut engine, rx) = make_engine();
    engine.spawn_enemy(Vec2::new(150.0, 325.0), EnemyKind::Medium);
    engine.input_mut().key_down(KeyCode::Char('z'));

    engine.update(1.0);

    assert_eq!(engine.enemies().len(), 1);
    let enemy = &engine.enemies()[0];
    assert_eq!(enemy.health(), 1.0);
    assert!(enemy.is_flashing(engine.clock_ms()));
    assert!(engine.projectiles().is_empty());
    assert_eq!(engine.score(), 0);
    assert!(drain(&rx).is_empty());
}

#[test]
fn missed_shots_are_culled_off_screen() {
    let (mut engine, _rx) = make_engine();
    engine.input_mut().key_down(KeyCode::Char('z'));
    engine.update(1.0);
    engine.input_mut().key_up(KeyCode::Char('z'));
    assert_eq!(engine.projectiles().len(), 1);

    // 8 px per frame from x=140; past 1000 well within 120 frames.
    tick(&mut engine, 120);
    assert!(engine.projectiles().is_empty());
}

// ── Run control ───────────────────────────────────────────────────────────────

#[test]
fn paused_engine_does_not_tick() {
    let (mut engine, _rx) = make_engine();
    engine.pause();
    tick(&mut engine, 5);
    assert_eq!(engine.frame(), 0);
    assert_eq!(engine.player().position(), Vec2::new(100.0, 300.0));

    engine.resume();
    engine.update(1.0);
    assert_eq!(engine.frame(), 1);
}

#[test]
fn destroy_is_idempotent_and_final() {
    let (mut engine, _rx) = make_engine();
    engine.load_level("test");
    engine.input_mut().connect();

    engine.destroy();
    engine.destroy();

    assert!(!engine.is_attached());
    assert!(engine.enemies().is_empty());
    assert!(engine.platforms().is_empty());
    assert!(!engine.player().is_active());
    assert!(!engine.input_mut().is_connected());

    engine.start();
    tick(&mut engine, 3);
    assert_eq!(engine.frame(), 0);
}

#[test]
fn restart_after_game_over_replays_same_level() {
    let mut config = GameConfig::default().with_seed(5);
    config.starting_lives = 1;
    let (mut engine, rx) = make_engine_with(config);
    engine.new_game("tower");
    engine.spawn_enemy(Vec2::new(105.0, 310.0), EnemyKind::Basic);
    engine.update(1.0);
    assert!(engine.is_game_over());
    engine.pause();
    drain(&rx);

    let level = engine.level_name().to_string();
    engine.new_game(&level);

    assert_eq!(engine.level_name(), "tower");
    assert!(!engine.is_game_over());
    assert!(!engine.is_paused());
    assert_eq!(engine.lives(), 1);
    assert_eq!(engine.enemies().len(), 3);
    assert_eq!(
        drain(&rx),
        [
            GameEvent::ScoreChanged(0),
            GameEvent::LivesChanged(1),
            GameEvent::WeaponChanged(0)
        ]
    );

    let frame = engine.frame();
    engine.update(1.0);
    assert_eq!(engine.frame(), frame + 1);
}
