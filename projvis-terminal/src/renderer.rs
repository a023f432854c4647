/// ASCII wireframe rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use projvis_core::{Frame, Segment, WireframeModel};
use std::io::Write;

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 2.0;

const VERTEX_CHAR: char = 'o';

/// Character-buffer renderer for projected wireframes.
///
/// Frames are fitted into a virtual viewport of `width` x `height * CELL_ASPECT`
/// units with the origin at the bottom-left, so one unit is the same physical
/// length along both axes.
pub struct WireframeRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
}

impl WireframeRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            char_buffer: vec![' '; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.char_buffer = vec![' '; width * height];
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
    }

    /// Size of the virtual viewport frames should be fitted into
    pub fn viewport_size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64 * CELL_ASPECT)
    }

    pub fn render_frame(&mut self, frame: &Frame, model: &WireframeModel) {
        for segment in frame.edges(model) {
            self.draw_segment(segment);
        }
        for &p in frame.screen_points() {
            if let Some((col, row)) = self.to_cell(p) {
                self.set(col, row, VERTEX_CHAR);
            }
        }
    }

    pub fn draw_segment(&mut self, segment: Segment) {
        let (vw, vh) = self.viewport_size();
        let Some((a, b)) = clip_segment(segment, vw, vh) else {
            return;
        };
        let (Some(start), Some(end)) = (self.to_cell(a), self.to_cell(b)) else {
            return;
        };
        let glyph = line_glyph(start, end);
        for (col, row) in bresenham(start, end) {
            self.set(col, row, glyph);
        }
    }

    /// Character at `(col, row)`, row 0 being the top line
    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        if col < self.width && row < self.height {
            Some(self.char_buffer[row * self.width + col])
        } else {
            None
        }
    }

    fn set(&mut self, col: usize, row: usize, c: char) {
        if col < self.width && row < self.height {
            self.char_buffer[row * self.width + col] = c;
        }
    }

    /// Convert a viewport point to a cell, flipping y so that up is up
    fn to_cell(&self, p: Point2<f64>) -> Option<(usize, usize)> {
        let (vw, vh) = self.viewport_size();
        if self.width == 0 || self.height == 0 || !p.x.is_finite() || !p.y.is_finite() {
            return None;
        }
        if p.x < 0.0 || p.x > vw || p.y < 0.0 || p.y > vh {
            return None;
        }
        let col = (p.x.floor() as usize).min(self.width - 1);
        let row = (((vh - p.y) / CELL_ASPECT).floor() as usize).min(self.height - 1);
        Some((col, row))
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];
                let color = match c {
                    VERTEX_CHAR => Color::Cyan,
                    ' ' => Color::Reset,
                    _ => Color::White,
                };
                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Liang-Barsky clipping of a segment to `[0, width] x [0, height]`
pub fn clip_segment((a, b): Segment, width: f64, height: f64) -> Option<Segment> {
    if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
        return None;
    }
    let d = b - a;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-d.x, a.x),
        (d.x, width - a.x),
        (-d.y, a.y),
        (d.y, height - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }

    let start = a + d * t0;
    let end = a + d * t1;
    if !(start.x.is_finite() && start.y.is_finite() && end.x.is_finite() && end.y.is_finite()) {
        return None;
    }
    // Rounding can leave the clipped ends a hair outside the box
    let clamp = |p: Point2<f64>| Point2::new(p.x.clamp(0.0, width), p.y.clamp(0.0, height));
    Some((clamp(start), clamp(end)))
}

/// Cells on the line from `start` to `end`, both included
fn bresenham(start: (usize, usize), end: (usize, usize)) -> Vec<(usize, usize)> {
    let (mut x, mut y) = (start.0 as i64, start.1 as i64);
    let (x1, y1) = (end.0 as i64, end.1 as i64);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut cells = Vec::with_capacity((dx - dy) as usize + 1);
    loop {
        cells.push((x as usize, y as usize));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}

/// Pick a line character from the on-screen slope
fn line_glyph(start: (usize, usize), end: (usize, usize)) -> char {
    let dx = end.0 as f64 - start.0 as f64;
    // Rows grow downwards
    let dy = start.1 as f64 - end.1 as f64;
    if dx == 0.0 && dy == 0.0 {
        return '.';
    }
    let angle = dy.atan2(dx).to_degrees().rem_euclid(180.0);
    match angle {
        a if !(22.5..157.5).contains(&a) => '-',
        a if a < 67.5 => '/',
        a if a < 112.5 => '|',
        _ => '\\',
    }
}
