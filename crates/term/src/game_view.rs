//! GameView: maps a [`Game`] into a terminal framebuffer.
//!
//! Pure (no I/O), so it can be unit-tested. Scene columns run left to right
//! on screen, the fall axis; scene rows run top to bottom. Moving shapes are
//! drawn between their previous and current cell, so a cell two terminal
//! columns wide gets half-cell motion.

use crate::core::{Game, RandomSource, ShapeKind, ShapeTransition};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Player;

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const LEFT_COLOR: Rgb = Rgb::new(80, 160, 240);
const RIGHT_COLOR: Rgb = Rgb::new(240, 130, 80);
const RUBBLE_COLOR: Rgb = Rgb::new(150, 150, 150);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of the board interior and its size in scene cells.
#[derive(Debug, Clone, Copy)]
struct Board {
    x: u16,
    y: u16,
    cols: u16,
    rows: u16,
}

pub struct GameView {
    /// Scene cell width in terminal columns.
    cell_w: u16,
    /// Scene cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for the usual glyph aspect ratio
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

fn player_color(player: Player) -> Rgb {
    match player {
        Player::Left => LEFT_COLOR,
        Player::Right => RIGHT_COLOR,
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Terminal size needed to show a whole scene plus the status line.
    pub fn required_viewport(&self, scene_width: usize, scene_height: usize) -> Viewport {
        Viewport::new(
            scene_width as u16 * self.cell_w + 2,
            scene_height as u16 * self.cell_h + 3,
        )
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into<R: RandomSource>(&self, game: &Game<R>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let scene = game.scene();
        let needed = self.required_viewport(scene.width(), scene.height());
        let board = Board {
            x: viewport.width.saturating_sub(needed.width) / 2 + 1,
            y: viewport.height.saturating_sub(needed.height) / 2 + 1,
            cols: scene.width() as u16,
            rows: scene.height() as u16,
        };
        let (frame_w, frame_h) = (
            board.cols * self.cell_w + 2,
            board.rows * self.cell_h + 2,
        );

        let empty = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();
        for row in 0..board.rows {
            for col in 0..board.cols {
                self.fill_cell(fb, board, col as f32, row as f32, empty.cell('·'));
            }
        }
        self.draw_border(fb, board.x - 1, board.y - 1, frame_w, frame_h);

        for cell in game.rubble_view() {
            let color = match cell.destination.kind() {
                ShapeKind::Rubble {
                    fall_caused_by: Some(player),
                    ..
                } => player_color(player),
                _ => RUBBLE_COLOR,
            };
            let style = CellStyle::new(color, BOARD_BG);
            self.draw_transition(fb, board, &cell, style.cell('▓'));
        }
        for player in Player::ALL {
            if let Some(piece) = game.player_view(player) {
                let style = CellStyle::new(player_color(player), BOARD_BG).bold();
                self.draw_transition(fb, board, &piece, style.cell('█'));
            }
        }

        self.draw_status(fb, game, board.x - 1, board.y - 1 + frame_h, frame_w);

        if game.is_game_over() {
            self.draw_overlay(fb, board.x - 1, board.y - 1, frame_w, frame_h, "GAME OVER");
        } else if game.is_paused() {
            self.draw_overlay(fb, board.x - 1, board.y - 1, frame_w, frame_h, "PAUSED");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render<R: RandomSource>(&self, game: &Game<R>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }

    fn draw_transition(
        &self,
        fb: &mut FrameBuffer,
        board: Board,
        transition: &ShapeTransition,
        cell: crate::fb::Cell,
    ) {
        let (col, row) = transition.origin();
        for (r, c) in transition.destination.pattern().cells() {
            self.fill_cell(fb, board, col + r as f32, row + c as f32, cell);
        }
    }

    /// Fill the terminal cells of a (possibly fractional) scene position.
    fn fill_cell(&self, fb: &mut FrameBuffer, board: Board, col: f32, row: f32, cell: crate::fb::Cell) {
        let max_x = (board.cols * self.cell_w) as f32;
        let max_y = (board.rows * self.cell_h) as f32;
        let px = (col * self.cell_w as f32).round();
        let py = (row * self.cell_h as f32).round();
        if px < 0.0 || py < 0.0 || px >= max_x || py >= max_y {
            return;
        }
        fb.fill_rect(
            board.x + px as u16,
            board.y + py as u16,
            self.cell_w,
            self.cell_h,
            cell,
        );
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
        if w < 2 || h < 2 {
            return;
        }
        let style = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        fb.set(x, y, style.cell('┌'));
        fb.set(x + w - 1, y, style.cell('┐'));
        fb.set(x, y + h - 1, style.cell('└'));
        fb.set(x + w - 1, y + h - 1, style.cell('┘'));
        for dx in 1..w - 1 {
            fb.set(x + dx, y, style.cell('─'));
            fb.set(x + dx, y + h - 1, style.cell('─'));
        }
        for dy in 1..h - 1 {
            fb.set(x, y + dy, style.cell('│'));
            fb.set(x + w - 1, y + dy, style.cell('│'));
        }
    }

    /// Player names at both ends, speed multiplier in the middle.
    fn draw_status<R: RandomSource>(&self, fb: &mut FrameBuffer, game: &Game<R>, x: u16, y: u16, w: u16) {
        let label = |player: Player| {
            let style = CellStyle::new(player_color(player), Rgb::new(0, 0, 0)).bold();
            if game.on_penalty(player) {
                (format!("{}!", player.as_str()), style.dim())
            } else {
                (player.as_str().to_string(), style)
            }
        };

        let (left, left_style) = label(Player::Left);
        fb.put_str(x, y, &left, left_style);

        let (right, right_style) = label(Player::Right);
        let right_x = x + w.saturating_sub(right.chars().count() as u16);
        fb.put_str(right_x, y, &right, right_style);

        // speed only where it clears both labels
        let speed = format!("x{:.2}", game.speed_multiplier());
        let speed_x = x + w.saturating_sub(speed.len() as u16) / 2;
        let left_end = x + left.chars().count() as u16;
        if speed_x > left_end && speed_x + (speed.len() as u16) < right_x {
            fb.put_str(speed_x, y, &speed, CellStyle::default().dim());
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, text: &str) {
        let text_w = text.chars().count() as u16;
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        fb.put_str(x + w.saturating_sub(text_w) / 2, y + h / 2, text, style);
    }
}
