mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};

use ascii_man::input::ReleasePolicy;
use ascii_man::levels::LevelProvider;
use ascii_man::ticker::FrameClock;
use ascii_man::{logging, GameConfig, GameEngine, GameEvent};

use display::Hud;

/// Engine steps a key counts as held after its last press/repeat, on
/// terminals that never report releases. Steps run at ≈60 Hz, so 8 steps is
/// ≈133 ms; OS key-repeat is ≥15 Hz and refreshes a held key before expiry.
const HOLD_WINDOW: u64 = 8;

#[derive(Parser)]
#[command(name = "ascii_man")]
#[command(about = "Side-scrolling ASCII platformer")]
struct Args {
    /// Level to play; skips the menu
    #[arg(long)]
    level: Option<String>,

    /// Seed for enemy glyph selection
    #[arg(long)]
    seed: Option<u64>,

    /// Frames rendered per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Append tracing output to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(String),
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "◆  ASCII-MAN  ◆";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select level:"))?;

    let levels: Vec<&'static str> = LevelProvider::new().names().collect();
    for (i, name) in levels.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", i + 1)))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(name))?;
    }

    let legend_row = cy + levels.len() as u16 + 1;
    out.queue(cursor::MoveTo(cx.saturating_sub(10), legend_row))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Grab [+1] to upgrade: Rock → Pistol → Shotgun → Machine Gun → Ray Gun"))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(10), legend_row + 2))?;
    out.queue(Print("← → / A D : Move   SPACE : Jump   Z : Shoot   P : Pause   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Wait for a level pick or quit
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(MenuResult::Quit); // event reader gone
        };
        let Event::Key(KeyEvent { code, kind, .. }) = event else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(MenuResult::Quit),
            KeyCode::Char(c) => {
                let picked = c
                    .to_digit(10)
                    .and_then(|n| (n as usize).checked_sub(1))
                    .and_then(|i| levels.get(i));
                if let Some(name) = picked {
                    return Ok(MenuResult::Start(name.to_string()));
                }
            }
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits. `R` after game over restarts the same level
/// in place.
///
/// Host keys (quit, pause, restart) are handled here; every key event is also
/// forwarded to the engine's input source, which applies them in order at the
/// start of the next tick.
fn game_loop<W: Write>(
    out: &mut W,
    engine: &mut GameEngine,
    hud: &mut Hud,
    rx: &mpsc::Receiver<Event>,
    game_events: &mpsc::Receiver<GameEvent>,
    clock: &mut FrameClock,
) -> std::io::Result<()> {
    let input_tx = engine.input_mut().connect();
    clock.reset();

    loop {
        let frame_start = Instant::now();

        // ── Host keys first, then hand everything to the engine ───────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(key) = ev else {
                continue;
            };
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') if hud.game_over => {
                        let level = engine.level_name().to_string();
                        *hud = Hud::default();
                        engine.new_game(&level);
                        clock.reset();
                        continue;
                    }
                    KeyCode::Char('p') | KeyCode::Char('P') if !hud.game_over => {
                        if engine.is_paused() {
                            engine.resume();
                        } else {
                            engine.pause();
                        }
                    }
                    _ => {}
                }
            }
            let _ = input_tx.send(key);
        }

        let dt = clock.tick();
        engine.advance(dt);

        for event in game_events.try_iter() {
            hud.apply(event);
            if event == GameEvent::GameOver {
                engine.pause();
            }
        }

        let (width, height) = terminal::size()?;
        display::render(out, engine, hud, width, height)?;

        clock.wait(frame_start);
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        logging::init_file_logging(path)?;
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Terminals speaking the kitty keyboard protocol report releases; the
    // rest get the hold window.
    let keyboard_enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();

    // Blocking reads live on their own thread; the loop only polls the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &args, keyboard_enhanced);

    // Restore the terminal even when the run failed
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    args: &Args,
    keyboard_enhanced: bool,
) -> anyhow::Result<()> {
    let mut config = GameConfig::default();
    config.seed = args.seed;
    config.release_policy = if keyboard_enhanced {
        ReleasePolicy::KeyUp
    } else {
        ReleasePolicy::HoldWindow(HOLD_WINDOW)
    };

    let level = match &args.level {
        Some(level) => level.clone(),
        None => match show_menu(out, rx)? {
            MenuResult::Quit => return Ok(()),
            MenuResult::Start(level) => level,
        },
    };

    let mut clock = FrameClock::new(args.fps);
    let (events_tx, events_rx) = mpsc::channel();
    let mut engine = GameEngine::new(config, events_tx)?;
    let mut hud = Hud::new(engine.lives());

    engine.new_game(&level);
    game_loop(out, &mut engine, &mut hud, rx, &events_rx, &mut clock)?;
    engine.destroy();

    tracing::info!(score = hud.score, "run finished");
    Ok(())
}
