//! Terminal canvas — the world rasterised onto character cells.
//!
//! Draw calls only touch an in-memory cell grid; `present` translates the
//! grid into crossterm commands and flushes once per frame.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color as TermColor, Print},
    QueueableCommand,
};
use glam::Vec2;

use crate::entities::Color;
use crate::host::Canvas;

const CELL_GLYPH: char = '█';
const C_HINT: TermColor = TermColor::DarkGrey;

pub struct TerminalCanvas<W: Write> {
    out: W,
    world: Vec2,
    cols: u16,
    /// Rows available to the arena; the hint row sits below them.
    rows: u16,
    cells: Vec<Option<Color>>,
}

impl<W: Write> TerminalCanvas<W> {
    /// `rows` is the full terminal height including the hint row.
    pub fn new(out: W, world: Vec2, cols: u16, rows: u16) -> Self {
        let mut canvas = Self {
            out,
            world,
            cols: 0,
            rows: 0,
            cells: Vec::new(),
        };
        canvas.resize(cols, rows);
        canvas
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.saturating_sub(1).max(1);
        self.cells = vec![None; self.cols as usize * self.rows as usize];
    }

    /// Arena size in cells (columns, rows).
    pub fn grid(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<Color> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[row as usize * self.cols as usize + col as usize]
    }

    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn cell_size(&self) -> Vec2 {
        Vec2::new(
            self.world.x / self.cols as f32,
            self.world.y / self.rows as f32,
        )
    }

    /// Cell containing a world point, if it lies inside the arena.
    pub fn world_to_cell(&self, p: Vec2) -> Option<(u16, u16)> {
        let size = self.cell_size();
        let col = (p.x / size.x).floor();
        let row = (p.y / size.y).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f32 || row >= self.rows as f32 {
            return None;
        }
        Some((col as u16, row as u16))
    }

    fn paint(&mut self, col: u16, row: u16, color: Color) {
        if col < self.cols && row < self.rows {
            let idx = row as usize * self.cols as usize + col as usize;
            self.cells[idx] = Some(color);
        }
    }

    /// Write the grid and the hint line, then flush.
    pub fn present(&mut self, hint: &str) -> std::io::Result<()> {
        let mut current: Option<Color> = None;
        for row in 0..self.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            for col in 0..self.cols {
                match self.cells[row as usize * self.cols as usize + col as usize] {
                    Some(color) => {
                        if current != Some(color) {
                            let (r, g, b) = color.rgb();
                            self.out
                                .queue(style::SetForegroundColor(TermColor::Rgb { r, g, b }))?;
                            current = Some(color);
                        }
                        self.out.queue(Print(CELL_GLYPH))?;
                    }
                    None => {
                        self.out.queue(Print(' '))?;
                    }
                }
            }
        }

        // Hint row, padded so a shorter hint clears the previous one
        self.out.queue(cursor::MoveTo(0, self.rows))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        let width = self.cols as usize;
        let line: String = hint.chars().take(width).collect();
        self.out.queue(Print(format!("{:<width$}", line)))?;

        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Fills every cell whose centre is inside the circle, plus the cell
    /// under the centre so sub-cell circles stay visible.
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        let size = self.cell_size();
        let centre = Vec2::new(x, y);

        let col_min = ((x - radius) / size.x).floor().max(0.0) as i32;
        let col_max = ((x + radius) / size.x).ceil().min(self.cols as f32) as i32;
        let row_min = ((y - radius) / size.y).floor().max(0.0) as i32;
        let row_max = ((y + radius) / size.y).ceil().min(self.rows as f32) as i32;

        for row in row_min..row_max {
            for col in col_min..col_max {
                let cell_centre = Vec2::new(
                    (col as f32 + 0.5) * size.x,
                    (row as f32 + 0.5) * size.y,
                );
                if cell_centre.distance_squared(centre) <= radius * radius {
                    self.paint(col as u16, row as u16, color);
                }
            }
        }

        if let Some((col, row)) = self.world_to_cell(centre) {
            self.paint(col, row, color);
        }
    }

    /// Samples the segment every half cell. Terminal cells are coarser than
    /// any thickness we draw, so the line is always one cell wide.
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, _thickness: f32) {
        let start = Vec2::new(x1, y1);
        let end = Vec2::new(x2, y2);
        let size = self.cell_size();
        let spacing = size.x.min(size.y) / 2.0;
        let steps = (start.distance(end) / spacing).ceil().max(1.0) as u32;

        for i in 0..=steps {
            let p = start.lerp(end, i as f32 / steps as f32);
            if let Some((col, row)) = self.world_to_cell(p) {
                self.paint(col, row, color);
            }
        }
    }
}
