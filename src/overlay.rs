// HUD compositor: committed canvas shapes, the current drag preview, a
// crosshair at the pointer, and 5x7 bitmap text for labels and the FPS
// readout. Draws onto the already-processed frame; never mutates the
// canvas or the parameter store.

use crate::canvas::{Canvas, Shape, Tool};
use crate::frame::{Frame, Point};

const HUD_TEXT_COLOR: u32 = 0x00FF_FFFF;
const CROSSHAIR_COLOR: u32 = 0x00FF_CC33;

pub struct OverlayRenderer;

impl OverlayRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Composite everything for this tick onto `frame`, in order: canvas,
    /// preview, crosshair, text. `fps` is shown truncated to an integer;
    /// the first tick's 0.0 sentinel renders as "FPS: 0".
    pub fn render(
        &self,
        frame: &mut Frame,
        canvas: &Canvas,
        preview: Option<Shape>,
        pointer: Option<Point>,
        fps: f32,
        labels: &[String],
    ) {
        for shape in canvas.shapes() {
            draw_shape(frame, shape);
        }
        if let Some(shape) = preview {
            draw_shape(frame, &shape);
        }
        if let Some(p) = pointer {
            draw_crosshair(frame, p.x, p.y, 12, CROSSHAIR_COLOR);
        }

        let mut y = 8;
        draw_text_5x7(frame, 8, y, &format!("FPS: {}", fps as i32), HUD_TEXT_COLOR);
        for label in labels {
            y += 10;
            draw_text_5x7(frame, 8, y, label, HUD_TEXT_COLOR);
        }
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn draw_shape(fb: &mut Frame, shape: &Shape) {
    let (a, e) = (shape.anchor, shape.end);
    match shape.tool {
        Tool::Line => draw_line(fb, a.x, a.y, e.x, e.y, shape.color),
        Tool::Rect => draw_rect(fb, a, e, shape.color),
        Tool::Circle => {
            let dx = (e.x - a.x) as f32;
            let dy = (e.y - a.y) as f32;
            let radius = (dx * dx + dy * dy).sqrt().round() as i32;
            draw_circle(fb, a.x, a.y, radius, shape.color);
        }
    }
}

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut Frame, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.pixels[y * fb.width + x] = color;
}

/// Thin line between (x0,y0) and (x1,y1) using Bresenham.
pub fn draw_line(fb: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Axis-aligned rectangle outline with opposite corners `a` and `e`.
pub fn draw_rect(fb: &mut Frame, a: Point, e: Point, color: u32) {
    let (x0, x1) = (a.x.min(e.x), a.x.max(e.x));
    let (y0, y1) = (a.y.min(e.y), a.y.max(e.y));
    draw_line(fb, x0, y0, x1, y0, color);
    draw_line(fb, x0, y1, x1, y1, color);
    draw_line(fb, x0, y0, x0, y1, color);
    draw_line(fb, x1, y0, x1, y1, color);
}

/// Midpoint circle outline centered at (cx,cy).
pub fn draw_circle(fb: &mut Frame, cx: i32, cy: i32, radius: i32, color: u32) {
    if radius <= 0 {
        put_pixel(fb, cx, cy, color);
        return;
    }
    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;
    while x >= y {
        for (px, py) in [
            (cx + x, cy + y),
            (cx - x, cy + y),
            (cx + x, cy - y),
            (cx - x, cy - y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx + y, cy - x),
            (cx - y, cy - x),
        ] {
            put_pixel(fb, px, py, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Small crosshair centered at (cx,cy) with a gap at the center.
pub fn draw_crosshair(fb: &mut Frame, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/* ---------------- 5x7 bitmap font for the HUD text ---------------- */

/// 5x7 glyph bitmap. Each u8 is a row; the low 5 bits are the pixels
/// (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b01110,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '/' => g!(0b00001,0b00001,0b00010,0b00100,0b01000,0b10000,0b10000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow so the
/// text stays readable over bright video.
fn draw_char_5x7(fb: &mut Frame, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx as i32 + 1, y + ry as i32 + 1, 0x00000000);
                }
            }
        }
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx as i32, y + ry as i32, color);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs with 1-pixel spacing.
pub fn draw_text_5x7(fb: &mut Frame, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    fn blank(w: usize, h: usize) -> Frame {
        Frame::new(w, h)
    }

    #[test]
    fn line_hits_both_endpoints() {
        let mut fb = blank(20, 20);
        draw_line(&mut fb, 2, 3, 10, 12, 0xFF);
        assert_eq!(fb.pixels[3 * 20 + 2], 0xFF);
        assert_eq!(fb.pixels[12 * 20 + 10], 0xFF);
    }

    #[test]
    fn rect_outline_hits_all_four_corners() {
        let mut fb = blank(20, 20);
        draw_rect(&mut fb, Point::new(15, 12), Point::new(3, 2), 0xAB);
        for (x, y) in [(3, 2), (15, 2), (3, 12), (15, 12)] {
            assert_eq!(fb.pixels[y * 20 + x], 0xAB, "corner ({x},{y})");
        }
        // Interior stays untouched.
        assert_eq!(fb.pixels[7 * 20 + 9], 0);
    }

    #[test]
    fn circle_touches_its_cardinal_points() {
        let mut fb = blank(30, 30);
        draw_circle(&mut fb, 15, 15, 5, 0xCC);
        for (x, y) in [(20, 15), (10, 15), (15, 20), (15, 10)] {
            assert_eq!(fb.pixels[y * 30 + x], 0xCC);
        }
    }

    #[test]
    fn drawing_clips_at_the_frame_edges() {
        let mut fb = blank(10, 10);
        draw_line(&mut fb, -5, -5, 15, 15, 0xEE);
        draw_circle(&mut fb, 0, 0, 8, 0xEE);
        // No panic is the real assertion; spot-check an in-bounds pixel.
        assert_eq!(fb.pixels[0], 0xEE);
    }

    #[test]
    fn render_composites_canvas_and_preview_without_mutating_canvas() {
        let mut fb = blank(64, 64);
        let mut canvas = Canvas::new();
        canvas.commit(Shape {
            tool: Tool::Line,
            anchor: Point::new(40, 40),
            end: Point::new(50, 40),
            color: 0x11,
        });
        let preview = Shape {
            tool: Tool::Line,
            anchor: Point::new(40, 50),
            end: Point::new(50, 50),
            color: 0x22,
        };
        OverlayRenderer::new().render(&mut fb, &canvas, Some(preview), None, 0.0, &[]);
        assert_eq!(fb.pixels[40 * 64 + 45], 0x11);
        assert_eq!(fb.pixels[50 * 64 + 45], 0x22);
        assert_eq!(canvas.shapes().len(), 1);
    }

    #[test]
    fn fps_label_renders_even_on_the_sentinel_tick() {
        let mut fb = blank(120, 30);
        OverlayRenderer::new().render(&mut fb, &Canvas::new(), None, None, 0.0, &[]);
        // "FPS: 0" must have put some white pixels down.
        assert!(fb.pixels.iter().any(|&px| px == HUD_TEXT_COLOR));
    }
}
