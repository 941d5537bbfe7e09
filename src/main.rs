//! Terminal Autumn Burst runner (default binary).
//!
//! Uses crossterm for keyboard and mouse input and the framebuffer renderer from
//! the `term` crate. The engine is driven with a fixed logical tick.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use autumn_burst::config::{Settings, ENV_LOG_FILTER};
use autumn_burst::core::{Game, GameSnapshot};
use autumn_burst::input::{map_key, map_mouse, should_quit, Command};
use autumn_burst::observe::EventLog;
use autumn_burst::term::{BoardView, BurstFlash, Decorations, FrameBuffer, TerminalRenderer, Viewport};
use autumn_burst::types::{Coord, TICK_MS};

fn main() -> Result<()> {
    let mut settings = Settings::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    settings.apply_args(&args)?;

    if let Some(path) = settings.log_path.as_deref() {
        init_logging(path)?;
    }

    let mut config = settings.engine_config()?;
    if settings.seed.is_none() {
        config = config.with_seed(clock_seed());
    }
    let game = Game::new(config)?;
    info!(mode = config.mode.as_str(), seed = config.seed, "starting");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, game);

    // Always try to restore terminal state.
    if let Err(err) = term.exit() {
        warn!(%err, "failed to restore terminal");
    }
    result
}

fn init_logging(path: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot open log file {path}"))?;
    let filter = EnvFilter::try_from_env(ENV_LOG_FILTER).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, mut game: Game) -> Result<()> {
    let view = BoardView::default();
    let mut flash = BurstFlash::new();
    let mut log = EventLog::new();

    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut cursor = Coord::new(0, 0);

    let tick_duration = Duration::from_millis(u64::from(TICK_MS));
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        game.snapshot_into(&mut snap);
        let deco = Decorations {
            cursor: Some(cursor),
            flash: flash.cells(),
            banner: flash.banner(),
        };
        view.render_into(&snap, &deco, viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            let command = match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    map_key(key, game.mode())
                }
                Event::Mouse(mouse) => map_mouse(mouse)
                    .and_then(|(x, y)| view.hit_test(&snap, viewport, x, y))
                    .map(|at| {
                        cursor = at;
                        Command::Activate
                    }),
                Event::Resize(..) => {
                    term.invalidate();
                    None
                }
                _ => None,
            };

            match command {
                Some(Command::Cursor { d_row, d_col }) => {
                    cursor = move_cursor(cursor, d_row, d_col, game.height(), game.width());
                }
                Some(Command::Activate) => {
                    game.activate(cursor.row, cursor.col)?;
                }
                Some(Command::Action(action)) => {
                    game.apply_action(action);
                }
                None => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            game.tick(TICK_MS);
            flash.tick(TICK_MS);
        }

        for event in game.drain_events() {
            event.dispatch(&mut flash);
            event.dispatch(&mut log);
        }
    }
}

fn move_cursor(at: Coord, d_row: i8, d_col: i8, height: usize, width: usize) -> Coord {
    let step = |v: usize, d: i8, len: usize| {
        v.saturating_add_signed(isize::from(d))
            .min(len.saturating_sub(1))
    };
    Coord::new(step(at.row, d_row, height), step(at.col, d_col, width))
}
