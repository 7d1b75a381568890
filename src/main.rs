//! Terminal runner (default binary).
//!
//! Reads keys with crossterm, feeds the press tracker's controls into
//! `Game::frame` once per tick and draws through the framebuffer renderer.
//! An optional first argument names a JSON config file; otherwise the
//! `NTETRIS_*` environment variables apply.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::info;

use ntetris::core::{Game, GameConfig};
use ntetris::input::{control_for_key, should_quit, ControlTracker};
use ntetris::logging;
use ntetris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

const TICK_MS: u64 = 16;

fn load_config() -> Result<GameConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            Ok(GameConfig::from_json_str(&json)?)
        }
        None => Ok(GameConfig::from_env()),
    }
}

fn main() -> Result<()> {
    logging::init_from_env()?;
    let config = load_config()?;
    let game = Game::new(config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, game);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, mut game: Game) -> Result<()> {
    let view = GameView::default();
    let mut tracker = ControlTracker::new();
    let mut fb = FrameBuffer::new(0, 0);

    let started = Instant::now();
    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS);
    info!("starting {}x{} game", game.scene().width(), game.scene().height());

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&game, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Release && should_quit(key) {
                        info!("quit requested");
                        return Ok(());
                    }
                    let now = started.elapsed().as_millis() as u64;
                    if let Some(control) = control_for_key(key) {
                        match key.kind {
                            KeyEventKind::Press | KeyEventKind::Repeat => tracker.press(control, now),
                            KeyEventKind::Release => tracker.release(control),
                        }
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            let now = started.elapsed().as_millis() as u64;
            let controls = tracker.update(now);
            game.frame(now, &controls)?;
        }
    }
}
