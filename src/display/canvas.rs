//! Cell-buffer rasteriser: maps logical canvas pixels onto terminal cells.
//!
//! A cell is covered by a shape when its centre lies inside the shape.
//! Translucent fills are blended onto whatever the cell already holds.

use crate::entities::{Rgba, Sprite, Stroke};
use crate::host::Surface;

pub const C_EMPTY: Rgba = Rgba::hex(0x000000);
const C_VIRUS: Rgba = Rgba::hex(0x3cb371);
const C_VIRUS_CORE: Rgba = Rgba::hex(0xb8f5c8);
const C_SPLASH: Rgba = Rgba::hex(0xe04040);
const C_GROUND: Rgba = Rgba::hex(0xc0c8d8);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgba,
    pub bg: Rgba,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Rgba::WHITE,
            bg: C_EMPTY,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Canvas {
    cols: usize,
    rows: usize,
    /// Logical pixels per cell.
    px_col: f64,
    px_row: f64,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize, width: f64, height: f64) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            px_col: width / cols as f64,
            px_row: height / rows as f64,
            cells: vec![Cell::default(); cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    fn cell_mut(&mut self, col: usize, row: usize) -> Option<&mut Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get_mut(row * self.cols + col)
    }

    /// Cells whose centres fall in `[start, start + len)` along one axis.
    fn span(start: f64, len: f64, px: f64, limit: usize) -> (usize, usize) {
        if len <= 0.0 {
            return (0, 0);
        }
        let to_cell = |v: f64| (v / px - 0.5).ceil().clamp(0.0, limit as f64) as usize;
        (to_cell(start), to_cell(start + len))
    }

    fn cols_of(&self, x: f64, w: f64) -> (usize, usize) {
        Self::span(x, w, self.px_col, self.cols)
    }

    fn rows_of(&self, y: f64, h: f64) -> (usize, usize) {
        Self::span(y, h, self.px_row, self.rows)
    }

    fn centre(&self, col: usize, row: usize) -> (f64, f64) {
        ((col as f64 + 0.5) * self.px_col, (row as f64 + 0.5) * self.px_row)
    }

    fn paint(&mut self, col: usize, row: usize, color: Rgba) {
        if let Some(cell) = self.cell_mut(col, row) {
            if color.is_opaque() {
                *cell = Cell {
                    bg: color,
                    ..Cell::default()
                };
            } else {
                cell.bg = color.over(cell.bg);
            }
        }
    }

    fn mark(&mut self, col: usize, row: usize, ch: char, fg: Rgba) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    /// Write text straight into the buffer, clipped at the right edge.
    pub fn put_str(&mut self, col: usize, row: usize, text: &str, fg: Rgba, bg: Option<Rgba>) {
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(col + i, row) {
                cell.ch = ch;
                cell.fg = fg;
                if let Some(bg) = bg {
                    cell.bg = bg;
                }
            }
        }
    }

    fn circle_cells(&self, cx: f64, cy: f64, radius: f64) -> Vec<(usize, usize, f64)> {
        let (c0, c1) = self.cols_of(cx - radius, radius * 2.0);
        let (r0, r1) = self.rows_of(cy - radius, radius * 2.0);
        let mut out = Vec::new();
        for row in r0..r1 {
            for col in c0..c1 {
                let (x, y) = self.centre(col, row);
                let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                out.push((col, row, dist));
            }
        }
        out
    }
}

impl Surface for Canvas {
    fn draw_image(&mut self, sprite: Sprite, x: f64, y: f64, w: f64, h: f64) {
        let (c0, c1) = self.cols_of(x, w);
        let (r0, r1) = self.rows_of(y, h);
        if c0 >= c1 || r0 >= r1 {
            return;
        }
        let (mid_c, mid_r) = ((c0 + c1 - 1) / 2, (r0 + r1 - 1) / 2);
        for row in r0..r1 {
            for col in c0..c1 {
                match sprite {
                    Sprite::Virus => {
                        self.paint(col, row, C_VIRUS);
                        let ch = if (col, row) == (mid_c, mid_r) { '◉' } else { '░' };
                        self.mark(col, row, ch, C_VIRUS_CORE);
                    }
                    Sprite::Splash => {
                        let ch = if (col + row) % 2 == 0 { '✶' } else { '·' };
                        self.mark(col, row, ch, C_SPLASH);
                    }
                    Sprite::Ground => self.mark(col, row, '▀', C_GROUND),
                }
            }
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        let (c0, c1) = self.cols_of(x, w);
        let (r0, r1) = self.rows_of(y, h);
        for row in r0..r1 {
            for col in c0..c1 {
                self.paint(col, row, color);
            }
        }
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, stroke: Stroke) {
        let (c0, c1) = self.cols_of(x, w);
        let (r0, r1) = self.rows_of(y, h);
        if c0 >= c1 || r0 >= r1 {
            return;
        }
        for row in r0..r1 {
            self.mark(c0, row, '│', stroke.color);
            if c1 - c0 > 1 {
                self.mark(c1 - 1, row, '│', stroke.color);
            }
        }
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba) {
        for (col, row, dist) in self.circle_cells(cx, cy, radius) {
            if dist <= radius {
                self.paint(col, row, color);
            }
        }
    }

    fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, stroke: Stroke) {
        let band = self.px_col.max(self.px_row) / 2.0;
        for (col, row, dist) in self.circle_cells(cx, cy, radius + band) {
            if (dist - radius).abs() <= band {
                self.mark(col, row, '○', stroke.color);
            }
        }
    }

    fn clear(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let (c0, c1) = self.cols_of(x, w);
        let (r0, r1) = self.rows_of(y, h);
        for row in r0..r1 {
            for col in c0..c1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    *cell = Cell::default();
                }
            }
        }
    }
}
