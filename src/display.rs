//! Rendering layer. All terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! engine. No game logic is performed; this module only translates world
//! coordinates into terminal cells. The fixed world viewport is scaled to
//! whatever play area the terminal offers.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use ascii_man::effects::EffectKind;
use ascii_man::entities::{Enemy, Facing, Player, PowerUp, Projectile};
use ascii_man::geometry::Vec2;
use ascii_man::levels::Platform;
use ascii_man::weapons;
use ascii_man::{GameEngine, GameEvent};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_WEAPON: Color = Color::Cyan;
const C_PLAYER: Color = Color::Green;
const C_ENEMY: Color = Color::Red;
const C_ENEMY_FLASH: Color = Color::White;
const C_PROJECTILE: Color = Color::Yellow;
const C_POWER_UP: Color = Color::Yellow;
const C_PLATFORM: Color = Color::Grey;
const C_HINT: Color = Color::DarkGrey;

const PLAYER_HEAD: &str = " o ";
const PLAYER_TORSO: &str = "-|-";
const PLAYER_LEGS: &str = "/ \\";

// ── HUD state fed by engine callbacks ─────────────────────────────────────────

/// What the host knows about the run, built purely from engine callbacks.
#[derive(Clone, Debug, Default)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub weapon_level: usize,
    pub game_over: bool,
}

impl Hud {
    pub fn new(lives: u32) -> Self {
        Hud {
            lives,
            ..Hud::default()
        }
    }

    pub fn apply(&mut self, event: GameEvent) {
        match event {
            GameEvent::ScoreChanged(score) => self.score = score,
            GameEvent::LivesChanged(lives) => self.lives = lives,
            GameEvent::WeaponChanged(level) => self.weapon_level = level,
            GameEvent::GameOver => self.game_over = true,
        }
    }
}

// ── World → terminal mapping ──────────────────────────────────────────────────

/// Play area: inside the border, rows 2 .. height-2.
struct Screen {
    width: u16,
    height: u16,
    camera_x: f32,
    cell_w: f32,
    cell_h: f32,
}

impl Screen {
    fn new(engine: &GameEngine, width: u16, height: u16) -> Self {
        let cols = width.saturating_sub(2).max(1) as f32;
        let rows = height.saturating_sub(4).max(1) as f32;
        let viewport = engine.viewport();
        Screen {
            width,
            height,
            camera_x: engine.camera_x(),
            cell_w: viewport.width / cols,
            cell_h: viewport.height / rows,
        }
    }

    /// Terminal cell for a world point, or `None` when off the play area.
    fn cell(&self, world: Vec2) -> Option<(u16, u16)> {
        let col = ((world.x - self.camera_x) / self.cell_w).floor() as i32 + 1;
        let row = (world.y / self.cell_h).floor() as i32 + 2;
        if col < 1 || col > self.width as i32 - 2 || row < 2 || row > self.height as i32 - 3 {
            return None;
        }
        Some((col as u16, row as u16))
    }

    /// Print `text` starting at a world point, clipping at the right wall.
    fn put<W: Write>(
        &self,
        out: &mut W,
        world: Vec2,
        text: &str,
        color: Color,
    ) -> std::io::Result<()> {
        let Some((col, row)) = self.cell(world) else {
            return Ok(());
        };
        let room = (self.width as usize).saturating_sub(1 + col as usize);
        let clipped: String = text.chars().take(room).collect();
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(clipped))?;
        Ok(())
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    engine: &GameEngine,
    hud: &Hud,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let screen = Screen::new(engine, width, height);

    draw_border(out, width, height)?;
    draw_hud(out, engine, hud, width)?;

    for platform in engine.platforms() {
        draw_platform(out, &screen, platform)?;
    }
    for power_up in engine.power_ups() {
        draw_power_up(out, &screen, power_up)?;
    }
    for enemy in engine.enemies() {
        draw_enemy(out, &screen, enemy, engine.clock_ms())?;
    }
    for projectile in engine.projectiles() {
        draw_projectile(out, &screen, projectile)?;
    }
    for effect in engine.effects() {
        let color = match (effect.kind(), effect.alpha() > 0.5) {
            (EffectKind::Impact, true) => Color::White,
            (EffectKind::Pickup, true) => Color::Yellow,
            (_, false) => Color::DarkGrey,
        };
        screen.put(out, effect.position(), effect.glyph(), color)?;
    }

    draw_player(out, &screen, engine.player())?;
    draw_controls_hint(out, height)?;

    if hud.game_over {
        draw_game_over(out, hud, width, height)?;
    } else if engine.is_paused() {
        draw_paused(out, width, height)?;
    }

    // Cursor out of the play area before the flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    engine: &GameEngine,
    hud: &Hud,
    width: u16,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", hud.score)))?;

    let level_str = format!("[ {} ]", engine.level_name().to_uppercase());
    let lx = (width / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&level_str))?;

    let weapon = weapons::weapon(hud.weapon_level);
    let weapon_str = format!("{} {}  ", weapon.name, weapon.art);
    let lives_str = format!("Lives:{}", "♥".repeat(hud.lives as usize));
    let right_len = weapon_str.chars().count() + lives_str.chars().count();

    out.queue(cursor::MoveTo(width.saturating_sub(right_len as u16 + 1), 0))?;
    out.queue(style::SetForegroundColor(C_HUD_WEAPON))?;
    out.queue(Print(&weapon_str))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_platform<W: Write>(
    out: &mut W,
    screen: &Screen,
    platform: &Platform,
) -> std::io::Result<()> {
    // Walk the platform one cell at a time so partly scrolled-off platforms
    // still draw their visible part.
    let cells = (platform.width / screen.cell_w).ceil().max(1.0) as usize;
    for i in 0..cells {
        let at = Vec2::new(platform.x + i as f32 * screen.cell_w, platform.y);
        screen.put(out, at, "▀", C_PLATFORM)?;
    }
    Ok(())
}

fn draw_power_up<W: Write>(
    out: &mut W,
    screen: &Screen,
    power_up: &PowerUp,
) -> std::io::Result<()> {
    screen.put(out, power_up.render_position(), power_up.glyph(), C_POWER_UP)
}

fn draw_enemy<W: Write>(
    out: &mut W,
    screen: &Screen,
    enemy: &Enemy,
    now_ms: f64,
) -> std::io::Result<()> {
    let color = if enemy.is_flashing(now_ms) { C_ENEMY_FLASH } else { C_ENEMY };
    screen.put(out, enemy.render_position(), &enemy.glyph().to_string(), color)
}

fn draw_projectile<W: Write>(
    out: &mut W,
    screen: &Screen,
    projectile: &Projectile,
) -> std::io::Result<()> {
    screen.put(out, projectile.position(), &projectile.glyph().to_string(), C_PROJECTILE)
}

fn draw_player<W: Write>(out: &mut W, screen: &Screen, player: &Player) -> std::io::Result<()> {
    // Sprite (3 rows, weapon held at torso height):
    //    o          o
    //   -|-/==   ==\-|-
    //   / \        / \
    if !player.is_visible() {
        return Ok(());
    }

    let p = player.position();
    let size = player.size();
    let row_h = size.height / 3.0;
    let art = player.weapon_art();
    let art_w = art.chars().count() as f32 * screen.cell_w;

    screen.put(out, p, PLAYER_HEAD, C_PLAYER)?;

    let torso = Vec2::new(p.x, p.y + row_h);
    match player.facing() {
        Facing::Right => {
            screen.put(out, torso, &format!("{}{}", PLAYER_TORSO, art), C_PLAYER)?;
        }
        Facing::Left => {
            screen.put(out, Vec2::new(torso.x - art_w, torso.y), &art, C_PLAYER)?;
            screen.put(out, torso, PLAYER_TORSO, C_PLAYER)?;
        }
    }

    screen.put(out, Vec2::new(p.x, p.y + row_h * 2.0), PLAYER_LEGS, C_PLAYER)?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Jump   Z : Shoot   P : Pause   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(String, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_paused<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let lines = [
        ("╔════════════════════╗".to_string(), Color::Cyan),
        ("║       PAUSED       ║".to_string(), Color::Cyan),
        ("╚════════════════════╝".to_string(), Color::Cyan),
        ("P - Resume  Q - Quit".to_string(), Color::White),
    ];
    draw_centered(out, &lines, width, height)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    hud: &Hud,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let lines = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (format!("Final Score: {:>6}", hud.score), Color::Yellow),
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];
    draw_centered(out, &lines, width, height)
}
