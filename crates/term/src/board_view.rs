//! BoardView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Coord, GameMode, Token};

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Things drawn on top of the board that the engine does not know about.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decorations<'a> {
    /// Burst-mode selection cursor.
    pub cursor: Option<Coord>,
    /// Cells removed by the last pass, still highlighted.
    pub flash: &'a [Coord],
    /// Transient message such as "SHUFFLED".
    pub banner: Option<&'a str>,
}

/// Where the framed board sits inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub x: u16,
    pub y: u16,
    pub frame_w: u16,
    pub frame_h: u16,
}

const PLAY_BG: Rgb = Rgb::new(34, 26, 22);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Autumn palette, indexed by token.
const TOKEN_COLORS: [Rgb; 8] = [
    Rgb::new(214, 96, 38),   // leaf
    Rgb::new(240, 150, 40),  // pumpkin
    Rgb::new(150, 100, 55),  // acorn
    Rgb::new(200, 45, 50),   // apple
    Rgb::new(190, 170, 150), // mushroom
    Rgb::new(245, 210, 60),  // sunflower
    Rgb::new(170, 110, 170), // pie
    Rgb::new(80, 130, 190),  // books
];

pub fn token_color(token: Token) -> Rgb {
    TOKEN_COLORS[usize::from(token.index()) % TOKEN_COLORS.len()]
}

/// A lightweight terminal renderer for the board.
pub struct BoardView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for BoardView {
    fn default() -> Self {
        // 2x1 roughly squares cells on common terminal fonts.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl BoardView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn layout(&self, snap: &GameSnapshot, viewport: Viewport) -> BoardLayout {
        let frame_w = (snap.width as u16)
            .saturating_mul(self.cell_w)
            .saturating_add(2);
        let frame_h = (snap.height as u16)
            .saturating_mul(self.cell_h)
            .saturating_add(2);
        // Leave room for the side panel when centering.
        let x = viewport.width.saturating_sub(frame_w + PANEL_W) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        BoardLayout {
            x,
            y,
            frame_w,
            frame_h,
        }
    }

    /// Board cell under terminal position `(x, y)`, if any.
    pub fn hit_test(&self, snap: &GameSnapshot, viewport: Viewport, x: u16, y: u16) -> Option<Coord> {
        let layout = self.layout(snap, viewport);
        let inner_x = x.checked_sub(layout.x + 1)?;
        let inner_y = y.checked_sub(layout.y + 1)?;
        let col = usize::from(inner_x / self.cell_w);
        let row = usize::from(inner_y / self.cell_h);
        (row < snap.height && col < snap.width).then_some(Coord::new(row, col))
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        deco: &Decorations<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let layout = self.layout(snap, viewport);
        let border = CellStyle::new(Rgb::new(200, 160, 110), PANEL_BG);
        fb.fill_rect(
            layout.x + 1,
            layout.y + 1,
            layout.frame_w.saturating_sub(2),
            layout.frame_h.saturating_sub(2),
            ' ',
            CellStyle::new(PLAY_BG, PLAY_BG),
        );
        draw_border(fb, layout, border);

        for row in 0..snap.height {
            for col in 0..snap.width {
                match snap.token(row, col) {
                    Some(token) => self.draw_token(fb, layout, row, col, token, false),
                    None => self.draw_empty(fb, layout, row, col),
                }
            }
        }

        if let Some(falling) = snap.falling {
            if falling.landing_row > falling.at.row {
                let ghost = CellStyle::new(token_color(falling.token), PLAY_BG).dim();
                self.fill_cell(fb, layout, falling.landing_row, falling.at.col, '░', ghost);
            }
            self.draw_token(fb, layout, falling.at.row, falling.at.col, falling.token, true);
        }

        let flash = CellStyle::new(Rgb::new(40, 20, 0), Rgb::new(255, 240, 180)).bold();
        for at in deco.flash {
            if at.row < snap.height && at.col < snap.width {
                self.fill_cell(fb, layout, at.row, at.col, '*', flash);
            }
        }

        if snap.mode == GameMode::Burst {
            if let Some(at) = deco.cursor {
                self.draw_cursor(fb, snap, layout, at);
            }
        }

        self.draw_side_panel(fb, snap, viewport, layout);

        let overlay = if snap.game_over {
            Some("GAME OVER")
        } else if snap.paused {
            Some("PAUSED")
        } else {
            deco.banner
        };
        if let Some(text) = overlay {
            draw_overlay_text(fb, layout, text);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, deco: &Decorations<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, deco, viewport, &mut fb);
        fb
    }

    fn cell_origin(&self, layout: BoardLayout, row: usize, col: usize) -> (u16, u16) {
        (
            layout.x + 1 + (col as u16) * self.cell_w,
            layout.y + 1 + (row as u16) * self.cell_h,
        )
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, layout: BoardLayout, row: usize, col: usize, ch: char, style: CellStyle) {
        let (px, py) = self.cell_origin(layout, row, col);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        fb.put_char(px + (self.cell_w - 1) / 2, py + (self.cell_h - 1) / 2, ch, style);
    }

    fn draw_empty(&self, fb: &mut FrameBuffer, layout: BoardLayout, row: usize, col: usize) {
        let style = CellStyle::new(Rgb::new(90, 75, 65), PLAY_BG).dim();
        self.fill_cell(fb, layout, row, col, '·', style);
    }

    fn draw_token(&self, fb: &mut FrameBuffer, layout: BoardLayout, row: usize, col: usize, token: Token, bold: bool) {
        let bg = token_color(token);
        let mut style = CellStyle::new(Rgb::new(20, 14, 10), bg);
        style.bold = bold;
        self.fill_cell(fb, layout, row, col, token.as_char(), style);
    }

    fn draw_cursor(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: BoardLayout, at: Coord) {
        if at.row >= snap.height || at.col >= snap.width {
            return;
        }
        let bg = snap
            .token(at.row, at.col)
            .map(token_color)
            .unwrap_or(PLAY_BG)
            .mix(Rgb::new(255, 255, 255), 140);
        let ch = snap.token(at.row, at.col).map(Token::as_char).unwrap_or('+');
        let style = CellStyle::new(Rgb::new(0, 0, 0), bg).bold();
        self.fill_cell(fb, layout, at.row, at.col, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, layout: BoardLayout) {
        let panel_x = layout.x.saturating_add(layout.frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < PANEL_W - 2 {
            return;
        }

        let label = CellStyle::new(Rgb::new(240, 200, 140), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(220, 210, 200), PANEL_BG);

        let mut y = layout.y;
        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u64(panel_x, y + 1, snap.score, value);
        y += 3;

        fb.put_str(panel_x, y, "LEVEL", label);
        fb.put_u32(panel_x, y + 1, snap.level, value);
        draw_progress(fb, panel_x, y + 2, PANEL_W - 4, snap.progress);
        y += 4;

        fb.put_str(panel_x, y, "COMBO", label);
        let x = fb.put_str(panel_x, y + 1, "x", value);
        fb.put_u32(x, y + 1, snap.combo, value);
        y += 3;

        if snap.mode == GameMode::Drop {
            fb.put_str(panel_x, y, "NEXT", label);
            for (i, token) in snap.next.iter().flatten().enumerate() {
                let ty = y + 1 + i as u16;
                if ty >= viewport.height {
                    break;
                }
                let swatch = CellStyle::new(Rgb::new(20, 14, 10), token_color(*token));
                fb.put_char(panel_x, ty, token.as_char(), swatch);
                fb.put_str(panel_x + 2, ty, token.name(), value.dim());
            }
        }
    }
}

/// Width reserved for the side panel, including the gap after the frame.
const PANEL_W: u16 = 16;

fn draw_progress(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, progress: f32) {
    let filled = ((progress.clamp(0.0, 1.0) * f32::from(w)).round() as u16).min(w);
    let on = CellStyle::new(Rgb::new(240, 150, 40), PANEL_BG);
    let off = CellStyle::new(Rgb::new(70, 60, 50), PANEL_BG).dim();
    for dx in 0..w {
        if dx < filled {
            fb.put_char(x + dx, y, '█', on);
        } else {
            fb.put_char(x + dx, y, '░', off);
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, layout: BoardLayout, style: CellStyle) {
    let BoardLayout {
        x,
        y,
        frame_w: w,
        frame_h: h,
    } = layout;
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '╭', style);
    fb.put_char(x + w - 1, y, '╮', style);
    fb.put_char(x, y + h - 1, '╰', style);
    fb.put_char(x + w - 1, y + h - 1, '╯', style);
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_overlay_text(fb: &mut FrameBuffer, layout: BoardLayout, text: &str) {
    let mid_y = layout.y.saturating_add(layout.frame_h / 2);
    let text_w = text.chars().count() as u16;
    let x = layout.x.saturating_add(layout.frame_w.saturating_sub(text_w) / 2);
    let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
    fb.put_str(x, mid_y, text, style);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(rows: &[&str]) -> GameSnapshot {
        let width = rows[0].len();
        let board = rows
            .iter()
            .flat_map(|r| r.chars())
            .map(|ch| Token::from_char(ch).map(|t| t.index() + 1).unwrap_or(0))
            .collect();
        let mut snap = GameSnapshot {
            width,
            height: rows.len(),
            board,
            ..GameSnapshot::default()
        };
        snap.rehash();
        snap
    }

    #[test]
    fn test_hit_test_maps_cells() {
        let view = BoardView::default();
        let snap = snap(&["AB", "CD"]);
        let vp = Viewport::new(40, 10);
        let layout = view.layout(&snap, vp);

        assert_eq!(view.hit_test(&snap, vp, layout.x, layout.y), None);
        assert_eq!(
            view.hit_test(&snap, vp, layout.x + 1, layout.y + 1),
            Some(Coord::new(0, 0))
        );
        assert_eq!(
            view.hit_test(&snap, vp, layout.x + 4, layout.y + 2),
            Some(Coord::new(1, 1))
        );
        assert_eq!(view.hit_test(&snap, vp, layout.x + 5, layout.y + 2), None);
    }

    #[test]
    fn test_tokens_drawn_as_letters() {
        let view = BoardView::default();
        let snap = snap(&["A.", ".H"]);
        let vp = Viewport::new(40, 10);
        let fb = view.render(&snap, &Decorations::default(), vp);
        let layout = view.layout(&snap, vp);

        let a = fb.get(layout.x + 1, layout.y + 1).unwrap();
        assert_eq!(a.ch, 'A');
        assert_eq!(a.style.bg, token_color(Token::wrapping(0)));
        assert_eq!(fb.get(layout.x + 3, layout.y + 1).unwrap().ch, '·');
        assert_eq!(fb.get(layout.x + 3, layout.y + 2).unwrap().ch, 'H');
    }

    #[test]
    fn test_overlay_priority() {
        let view = BoardView::default();
        let mut snap = snap(&["AAAA", "BBBB", "CCCC"]);
        snap.paused = true;
        let vp = Viewport::new(40, 10);
        let deco = Decorations {
            banner: Some("SHUFFLED"),
            ..Decorations::default()
        };
        let fb = view.render(&snap, &deco, vp);
        let layout = view.layout(&snap, vp);
        let row = fb.row_text(layout.y + layout.frame_h / 2);
        assert!(row.contains("PAUSED"));
        assert!(!row.contains("SHUFFLED"));
    }
}
