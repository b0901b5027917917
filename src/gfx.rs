//! Software rasterizer for RGB565 buffers
//!
//! [`Gfx2D`] borrows a [`PixelBuffer`] mutably and draws primitives into it.
//! It holds no state of its own beyond that borrow.
//!
//! Drawing never fails. Out of range coordinates, zero-area shapes and
//! degenerate polygons simply draw nothing (or only their visible part).
//!
//! ## Example
//!
//! ```
//! use st77xx::{Color565, Gfx2D, PixelBuffer, Point};
//!
//! let mut buf = PixelBuffer::new(32, 32);
//! let mut gfx = Gfx2D::new(&mut buf);
//!
//! gfx.fill_rect(2, 2, 10, 4, Color565::BLUE);
//! gfx.line(0, 0, 31, 31, Color565::WHITE);
//! gfx.fill_circle(16, 16, 5, Color565::RED);
//! gfx.fill_triangle(Point::new(0, 20), Point::new(10, 30), Point::new(0, 30), Color565::GREEN);
//! gfx.text(1, 24, "Hi", Color565::YELLOW, 1);
//!
//! assert_eq!(buf.get_pixel(16, 16), Some(Color565::RED));
//! ```

use crate::buffer::PixelBuffer;
use crate::color::Color565;
use crate::font::{self, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Integer point
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Integer rectangle with origin at the top left
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub w: i32,
    /// Height in pixels
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// Options for [`Gfx2D::blit`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlitOptions {
    /// Global opacity; 255 writes source pixels through unchanged
    pub alpha: u8,
    /// Source pixels equal to this color are skipped
    pub color_key: Option<Color565>,
    /// Multiplied into each source pixel before blending
    pub tint: Option<Color565>,
}

impl Default for BlitOptions {
    fn default() -> Self {
        Self {
            alpha: 255,
            color_key: None,
            tint: None,
        }
    }
}

/// 2D rasterizer over a borrowed [`PixelBuffer`]
pub struct Gfx2D<'a> {
    target: &'a mut PixelBuffer,
}

impl<'a> Gfx2D<'a> {
    /// Draw into `target`
    pub fn new(target: &'a mut PixelBuffer) -> Self {
        Self { target }
    }

    /// The buffer being drawn into
    pub fn target(&self) -> &PixelBuffer {
        self.target
    }

    /// Target width as a signed coordinate
    pub fn width(&self) -> i32 {
        i32::from(self.target.width())
    }

    /// Target height as a signed coordinate
    pub fn height(&self) -> i32 {
        i32::from(self.target.height())
    }

    /// Fill the whole target
    pub fn clear(&mut self, color: Color565) {
        self.target.clear(color);
    }

    /// Set one pixel, ignoring out of range coordinates
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color565) {
        self.target.set_pixel(x, y, color);
    }

    /// Read one pixel
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color565> {
        self.target.get_pixel(x, y)
    }

    /// Fill `[x0, x1)` on row `y`, with 64-bit bounds clamped to the target
    fn span(&mut self, y: i64, x0: i64, x1: i64, color: Color565) {
        if y < 0 || y >= i64::from(self.height()) {
            return;
        }
        let w = i64::from(self.width());
        let (x0, x1) = (x0.clamp(0, w), x1.clamp(0, w));
        self.target.fill_span(y as i32, x0 as i32, x1 as i32, color);
    }

    /// Line from `(x0, y0)` to `(x1, y1)`, both endpoints included
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color565) {
        let (mut x, mut y) = (i64::from(x0), i64::from(y0));
        let (x1, y1) = (i64::from(x1), i64::from(y1));
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            // Points beyond i32 never land in the buffer
            if let (Ok(px), Ok(py)) = (i32::try_from(x), i32::try_from(y)) {
                self.target.set_pixel(px, py, color);
            }
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
    }

    /// Rectangle outline
    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color565) {
        if w <= 0 || h <= 0 {
            return;
        }
        let right = x.saturating_add(w - 1);
        let bottom = y.saturating_add(h - 1);
        self.line(x, y, right, y, color);
        self.line(x, bottom, right, bottom, color);
        self.line(x, y, x, bottom, color);
        self.line(right, y, right, bottom, color);
    }

    /// Filled rectangle covering `[x, x + w) x [y, y + h)`
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color565) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x, y) = (i64::from(x), i64::from(y));
        let y0 = y.clamp(0, i64::from(self.height()));
        let y1 = (y + i64::from(h)).clamp(0, i64::from(self.height()));
        let x0 = x.clamp(0, i64::from(self.width()));
        let x1 = (x + i64::from(w)).clamp(0, i64::from(self.width()));
        if x1 <= x0 {
            return;
        }
        for row in y0..y1 {
            self.target.fill_span(row as i32, x0 as i32, x1 as i32, color);
        }
    }

    /// Circle outline using the midpoint algorithm
    ///
    /// A radius of zero plots the center; negative radii draw nothing.
    pub fn circle(&mut self, cx: i32, cy: i32, r: i32, color: Color565) {
        if r < 0 {
            return;
        }
        let (cx, cy) = (i64::from(cx), i64::from(cy));
        let mut x = i64::from(r);
        let mut y = 0i64;
        let mut err = 0i64;
        let mut plot = |px: i64, py: i64| {
            if let (Ok(px), Ok(py)) = (i32::try_from(px), i32::try_from(py)) {
                self.target.set_pixel(px, py, color);
            }
        };
        while x >= y {
            plot(cx + x, cy + y);
            plot(cx + y, cy + x);
            plot(cx - y, cy + x);
            plot(cx - x, cy + y);
            plot(cx - x, cy - y);
            plot(cx - y, cy - x);
            plot(cx + y, cy - x);
            plot(cx + x, cy - y);
            y += 1;
            err += 1 + 2 * y;
            if 2 * (err - x) + 1 > 0 {
                x -= 1;
                err += 1 - 2 * x;
            }
        }
    }

    /// Filled circle, one span per scanline
    pub fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color565) {
        if r <= 0 {
            return;
        }
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(r));
        let y0 = (cy - r).max(0);
        let y1 = (cy + r + 1).min(i64::from(self.height()));
        for y in y0..y1 {
            let dy = y - cy;
            let dx = ((r * r - dy * dy) as u64).isqrt() as i64;
            self.span(y, cx - dx, cx + dx + 1, color);
        }
    }

    /// Filled triangle
    ///
    /// Scanlines run over `[top, middle)` and `[middle, bottom)` of the
    /// y-sorted vertices, so the bottom row and flat edges are not drawn.
    pub fn fill_triangle(&mut self, p0: Point, p1: Point, p2: Point, color: Color565) {
        let mut pts = [p0, p1, p2];
        pts.sort_by_key(|p| p.y);
        let [a, b, c] = pts;

        let height = i64::from(self.height());
        let clip = |from: i32, to: i32| i64::from(from).max(0)..i64::from(to).min(height);

        for y in clip(a.y, b.y) {
            let xl = intercept(a, c, y);
            let xr = intercept(a, b, y);
            self.span(y, xl.min(xr), xl.max(xr) + 1, color);
        }
        for y in clip(b.y, c.y) {
            let xl = intercept(a, c, y);
            let xr = intercept(b, c, y);
            self.span(y, xl.min(xr), xl.max(xr) + 1, color);
        }
    }

    /// Filled convex polygon, fanned from the first point
    ///
    /// Fewer than three points draw nothing.
    pub fn fill_polygon(&mut self, points: &[Point], color: Color565) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        for pair in rest.windows(2) {
            self.fill_triangle(first, pair[0], pair[1], color);
        }
    }

    /// Linear gradient from `from` to `to`
    ///
    /// Interpolates the 5/6/5 channels independently across the width when
    /// `horizontal` is set, otherwise across the height.
    pub fn fill_rect_gradient(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        from: Color565,
        to: Color565,
        horizontal: bool,
    ) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (steps, origin, limit) = if horizontal {
            (i64::from(w), i64::from(x), i64::from(self.width()))
        } else {
            (i64::from(h), i64::from(y), i64::from(self.height()))
        };
        let (sr, sg, sb) = from.components();
        let (er, eg, eb) = to.components();
        let lerp = |s: u8, e: u8, i: i64| -> u8 {
            if steps == 1 {
                return s;
            }
            ((i64::from(s) * (steps - 1 - i) + i64::from(e) * i) / (steps - 1)) as u8
        };

        // Only the steps that land on the target are filled
        let first = (-origin).max(0);
        let last = (limit - origin).min(steps);
        for i in first..last {
            let color = Color565::from_components(lerp(sr, er, i), lerp(sg, eg, i), lerp(sb, eb, i));
            let pos = (origin + i) as i32;
            if horizontal {
                self.fill_rect(pos, y, 1, h, color);
            } else {
                self.fill_rect(x, pos, w, 1, color);
            }
        }
    }

    /// Copy `src_rect` of `src` to `dst`
    ///
    /// The source rectangle is clipped to the source buffer. Keyed pixels are
    /// skipped, the tint is applied next, then the pixel is written through
    /// (alpha 255) or blended over the destination.
    pub fn blit(&mut self, src: &PixelBuffer, src_rect: Rect, dst: Point, opts: BlitOptions) {
        if opts.alpha == 0 || src_rect.w <= 0 || src_rect.h <= 0 {
            return;
        }
        let sx0 = src_rect.x.max(0);
        let sy0 = src_rect.y.max(0);
        let sx1 = src_rect.x.saturating_add(src_rect.w).min(i32::from(src.width()));
        let sy1 = src_rect.y.saturating_add(src_rect.h).min(i32::from(src.height()));
        if sx1 <= sx0 || sy1 <= sy0 {
            return;
        }

        for sy in sy0..sy1 {
            let Some(row) = src.row(sy as u16) else {
                continue;
            };
            let dy = i64::from(dst.y) + i64::from(sy - src_rect.y);
            let Ok(dy) = i32::try_from(dy) else {
                continue;
            };
            if dy < 0 || dy >= self.height() {
                continue;
            }
            for sx in sx0..sx1 {
                let Ok(dx) = i32::try_from(i64::from(dst.x) + i64::from(sx - src_rect.x)) else {
                    continue;
                };
                let pixel = row[sx as usize];
                if opts.color_key == Some(pixel) {
                    continue;
                }
                let pixel = opts.tint.map_or(pixel, |t| pixel.modulate(t));
                if opts.alpha == 255 {
                    self.target.set_pixel(dx, dy, pixel);
                } else if let Some(under) = self.target.get_pixel(dx, dy) {
                    self.target.set_pixel(dx, dy, pixel.blend(under, opts.alpha));
                }
            }
        }
    }

    /// Blend an RGBA8888 image of `sw x sh` pixels at `dst`
    ///
    /// Each pixel's alpha is scaled by `alpha`. A source slice shorter than
    /// `sw * sh * 4` bytes draws as many whole pixels as it holds.
    pub fn blit_rgba(&mut self, src: &[u8], sw: u16, sh: u16, dst: Point, alpha: u8) {
        for y in 0..usize::from(sh) {
            let dy = i64::from(dst.y) + y as i64;
            for x in 0..usize::from(sw) {
                let i = (y * usize::from(sw) + x) * 4;
                let Some(&[r, g, b, a]) = src.get(i..i + 4) else {
                    return;
                };
                let dx = i64::from(dst.x) + x as i64;
                let (Ok(dx), Ok(dy)) = (i32::try_from(dx), i32::try_from(dy)) else {
                    continue;
                };
                let Some(under) = self.target.get_pixel(dx, dy) else {
                    continue;
                };
                let a = (u16::from(a) * u16::from(alpha) / 255) as u8;
                self.target.set_pixel(dx, dy, Color565::from_rgb(r, g, b).blend(under, a));
            }
        }
    }

    /// Draw `text` with the 5x7 font
    ///
    /// Glyphs advance by `5 * scale + 1` pixels. Characters without a glyph
    /// draw as `?`. A scale of zero is treated as one.
    pub fn text(&mut self, x: i32, y: i32, text: &str, color: Color565, scale: u8) {
        let scale = i32::from(scale.max(1));
        let advance = i32::from(GLYPH_WIDTH) * scale + 1;
        let mut cx = x;
        for ch in text.chars() {
            let columns = font::glyph(ch);
            for (col, bits) in (0i32..).zip(columns.iter()) {
                for row in 0..i32::from(GLYPH_HEIGHT) {
                    if bits & (1 << row) == 0 {
                        continue;
                    }
                    let px = cx.saturating_add(col * scale);
                    let py = y.saturating_add(row * scale);
                    if scale == 1 {
                        self.target.set_pixel(px, py, color);
                    } else {
                        self.fill_rect(px, py, scale, scale, color);
                    }
                }
            }
            cx = cx.saturating_add(advance);
        }
    }
}

/// X where edge `p0 -> p1` crosses scanline `y`
fn intercept(p0: Point, p1: Point, y: i64) -> i64 {
    let dy = i64::from(p1.y) - i64::from(p0.y);
    if dy == 0 {
        return i64::from(p0.x);
    }
    let run = i128::from(p1.x) - i128::from(p0.x);
    let x = i128::from(p0.x) + i128::from(y - i64::from(p0.y)) * run / i128::from(dy);
    x as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(buf: &PixelBuffer, color: Color565) -> usize {
        buf.as_slice().iter().filter(|&&c| c == color).count()
    }

    #[test]
    fn test_fill_rect_sets_exact_region() {
        let mut buf = PixelBuffer::new(8, 8);
        Gfx2D::new(&mut buf).fill_rect(2, 2, 3, 3, Color565::new(0xF800));
        for y in 0..8 {
            for x in 0..8 {
                let inside = (2..5).contains(&x) && (2..5).contains(&y);
                let expected = if inside { Color565::RED } else { Color565::BLACK };
                assert_eq!(buf.get_pixel(x, y), Some(expected), "({x},{y})");
            }
        }
        assert_eq!(count(&buf, Color565::RED), 9);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut buf = PixelBuffer::new(4, 4);
        let mut gfx = Gfx2D::new(&mut buf);
        gfx.fill_rect(-2, -2, 4, 4, Color565::WHITE);
        gfx.fill_rect(3, 3, i32::MAX, i32::MAX, Color565::WHITE);
        gfx.fill_rect(1, 1, 0, 5, Color565::BLUE);
        assert_eq!(count(&buf, Color565::WHITE), 5);
        assert_eq!(count(&buf, Color565::BLUE), 0);
    }

    #[test]
    fn test_line_includes_endpoints() {
        let mut buf = PixelBuffer::new(10, 10);
        Gfx2D::new(&mut buf).line(1, 2, 7, 5, Color565::GREEN);
        assert_eq!(buf.get_pixel(1, 2), Some(Color565::GREEN));
        assert_eq!(buf.get_pixel(7, 5), Some(Color565::GREEN));
        assert_eq!(count(&buf, Color565::GREEN), 7);
    }

    #[test]
    fn test_line_clips_per_point() {
        let mut buf = PixelBuffer::new(5, 5);
        Gfx2D::new(&mut buf).line(-3, 2, 8, 2, Color565::WHITE);
        assert_eq!(count(&buf, Color565::WHITE), 5);
    }

    #[test]
    fn test_rect_outline() {
        let mut buf = PixelBuffer::new(6, 6);
        Gfx2D::new(&mut buf).rect(1, 1, 4, 4, Color565::WHITE);
        assert_eq!(count(&buf, Color565::WHITE), 12);
        assert_eq!(buf.get_pixel(2, 2), Some(Color565::BLACK));
    }

    #[test]
    fn test_circle_is_symmetric() {
        let mut buf = PixelBuffer::new(21, 21);
        Gfx2D::new(&mut buf).circle(10, 10, 6, Color565::WHITE);
        for y in 0..21 {
            for x in 0..21 {
                let p = buf.get_pixel(x, y);
                assert_eq!(p, buf.get_pixel(20 - x, y));
                assert_eq!(p, buf.get_pixel(x, 20 - y));
                assert_eq!(p, buf.get_pixel(y, x));
            }
        }
        assert_eq!(buf.get_pixel(16, 10), Some(Color565::WHITE));
        assert_eq!(buf.get_pixel(10, 10), Some(Color565::BLACK));
    }

    #[test]
    fn test_fill_circle_spans() {
        let mut buf = PixelBuffer::new(11, 11);
        Gfx2D::new(&mut buf).fill_circle(5, 5, 3, Color565::RED);
        // Rows at dy = 0, 1, 2, 3 have half-widths 3, 2, 2, 0
        assert_eq!(count(&buf, Color565::RED), 7 + 2 * 5 + 2 * 5 + 2 * 1);
        assert_eq!(buf.get_pixel(5, 2), Some(Color565::RED));
        assert_eq!(buf.get_pixel(6, 2), Some(Color565::BLACK));
    }

    #[test]
    fn test_fill_circle_non_positive_radius() {
        let mut buf = PixelBuffer::new(4, 4);
        let mut gfx = Gfx2D::new(&mut buf);
        gfx.fill_circle(2, 2, 0, Color565::RED);
        gfx.fill_circle(2, 2, -4, Color565::RED);
        assert_eq!(count(&buf, Color565::RED), 0);
    }

    #[test]
    fn test_fill_triangle_right_angle() {
        let mut buf = PixelBuffer::new(8, 8);
        Gfx2D::new(&mut buf).fill_triangle(
            Point::new(0, 0),
            Point::new(4, 0),
            Point::new(0, 4),
            Color565::WHITE,
        );
        assert_eq!(buf.get_pixel(1, 1), Some(Color565::WHITE));
        assert_eq!(buf.get_pixel(3, 3), Some(Color565::BLACK));
        assert_eq!(buf.get_pixel(0, 0), Some(Color565::WHITE));
    }

    #[test]
    fn test_fill_triangle_winding_independent() {
        let mut a = PixelBuffer::new(16, 16);
        let mut b = PixelBuffer::new(16, 16);
        let (p0, p1, p2) = (Point::new(2, 1), Point::new(13, 6), Point::new(5, 14));
        Gfx2D::new(&mut a).fill_triangle(p0, p1, p2, Color565::CYAN);
        Gfx2D::new(&mut b).fill_triangle(p2, p1, p0, Color565::CYAN);
        assert_eq!(a, b);
        assert!(count(&a, Color565::CYAN) > 0);
    }

    #[test]
    fn test_fill_triangle_degenerate() {
        let mut buf = PixelBuffer::new(8, 8);
        Gfx2D::new(&mut buf).fill_triangle(
            Point::new(0, 3),
            Point::new(7, 3),
            Point::new(3, 3),
            Color565::WHITE,
        );
        assert_eq!(count(&buf, Color565::WHITE), 0);
    }

    #[test]
    fn test_fill_triangle_offscreen_does_not_hang() {
        let mut buf = PixelBuffer::new(8, 8);
        Gfx2D::new(&mut buf).fill_triangle(
            Point::new(i32::MIN, i32::MIN),
            Point::new(i32::MAX, 0),
            Point::new(0, i32::MAX),
            Color565::WHITE,
        );
    }

    #[test]
    fn test_fill_polygon() {
        let mut buf = PixelBuffer::new(10, 10);
        let mut gfx = Gfx2D::new(&mut buf);
        gfx.fill_polygon(&[Point::new(0, 0), Point::new(5, 5)], Color565::RED);
        assert_eq!(count(gfx.target(), Color565::RED), 0);

        let square = [Point::new(2, 2), Point::new(6, 2), Point::new(6, 6), Point::new(2, 6)];
        gfx.fill_polygon(&square, Color565::RED);
        assert_eq!(buf.get_pixel(4, 4), Some(Color565::RED));
        assert_eq!(buf.get_pixel(2, 2), Some(Color565::RED));
        assert_eq!(buf.get_pixel(8, 4), Some(Color565::BLACK));
    }

    #[test]
    fn test_gradient_endpoints() {
        let mut buf = PixelBuffer::new(8, 4);
        Gfx2D::new(&mut buf).fill_rect_gradient(0, 0, 8, 4, Color565::BLACK, Color565::WHITE, true);
        assert_eq!(buf.get_pixel(0, 0), Some(Color565::BLACK));
        assert_eq!(buf.get_pixel(7, 3), Some(Color565::WHITE));
        let (r, _, _) = buf.get_pixel(4, 1).map(Color565::components).unwrap_or_default();
        assert!(r > 0 && r < 31);
    }

    #[test]
    fn test_gradient_vertical_single_step() {
        let mut buf = PixelBuffer::new(4, 4);
        Gfx2D::new(&mut buf).fill_rect_gradient(0, 1, 4, 1, Color565::RED, Color565::BLUE, false);
        assert_eq!(count(&buf, Color565::RED), 4);
        assert_eq!(buf.get_pixel(0, 1), Some(Color565::RED));
    }

    #[test]
    fn test_blit_key_and_write_through() {
        let mut src = PixelBuffer::filled(3, 3, Color565::GREEN);
        src.set_pixel(1, 1, Color565::MAGENTA);
        let mut dst = PixelBuffer::filled(5, 5, Color565::BLUE);
        let opts = BlitOptions {
            color_key: Some(Color565::MAGENTA),
            ..BlitOptions::default()
        };
        Gfx2D::new(&mut dst).blit(&src, Rect::new(0, 0, 3, 3), Point::new(1, 1), opts);
        assert_eq!(count(&dst, Color565::GREEN), 8);
        assert_eq!(dst.get_pixel(2, 2), Some(Color565::BLUE));
        assert_eq!(dst.get_pixel(0, 0), Some(Color565::BLUE));
    }

    #[test]
    fn test_blit_tint_and_alpha() {
        let src = PixelBuffer::filled(2, 2, Color565::WHITE);
        let mut dst = PixelBuffer::new(2, 2);
        let opts = BlitOptions {
            tint: Some(Color565::RED),
            ..BlitOptions::default()
        };
        Gfx2D::new(&mut dst).blit(&src, Rect::new(0, 0, 2, 2), Point::new(0, 0), opts);
        assert_eq!(count(&dst, Color565::RED), 4);

        let mut dst = PixelBuffer::new(2, 2);
        let opts = BlitOptions {
            alpha: 128,
            ..BlitOptions::default()
        };
        Gfx2D::new(&mut dst).blit(&src, Rect::new(0, 0, 2, 2), Point::new(0, 0), opts);
        let p = dst.get_pixel(0, 0).unwrap_or_default();
        assert_eq!(p, Color565::WHITE.blend(Color565::BLACK, 128));
    }

    #[test]
    fn test_blit_clips_source_rect() {
        let mut src = PixelBuffer::new(4, 2);
        src.set_pixel(3, 1, Color565::YELLOW);
        let mut dst = PixelBuffer::new(4, 4);
        Gfx2D::new(&mut dst).blit(&src, Rect::new(2, -1, 10, 10), Point::new(0, 0), BlitOptions::default());
        // Source row 1, column 3 sits at offset (1, 2) from the requested origin
        assert_eq!(dst.get_pixel(1, 2), Some(Color565::YELLOW));
        assert_eq!(count(&dst, Color565::YELLOW), 1);
    }

    #[test]
    fn test_blit_rgba() {
        let src = [255, 0, 0, 255, 0, 0, 255, 0, 0, 0, 255, 255];
        let mut dst = PixelBuffer::filled(3, 1, Color565::GREEN);
        Gfx2D::new(&mut dst).blit_rgba(&src, 3, 1, Point::new(0, 0), 255);
        assert_eq!(dst.get_pixel(0, 0), Some(Color565::RED));
        assert_eq!(dst.get_pixel(1, 0), Some(Color565::GREEN));
        assert_eq!(dst.get_pixel(2, 0), Some(Color565::BLUE));

        let mut dst = PixelBuffer::filled(1, 1, Color565::GREEN);
        Gfx2D::new(&mut dst).blit_rgba(&src[..4], 1, 1, Point::new(0, 0), 0);
        assert_eq!(dst.get_pixel(0, 0), Some(Color565::GREEN));
    }

    #[test]
    fn test_blit_rgba_short_source() {
        let mut dst = PixelBuffer::new(2, 2);
        Gfx2D::new(&mut dst).blit_rgba(&[255, 255, 255, 255, 1, 2], 2, 2, Point::new(0, 0), 255);
        assert_eq!(count(&dst, Color565::WHITE), 1);
    }

    #[test]
    fn test_text_glyph_placement() {
        let mut buf = PixelBuffer::new(16, 8);
        Gfx2D::new(&mut buf).text(0, 0, "II", Color565::WHITE, 1);
        // 'I' is a full-height stem at column 2 with serifs in columns 1 and 3
        assert_eq!(buf.get_pixel(2, 3), Some(Color565::WHITE));
        assert_eq!(buf.get_pixel(1, 0), Some(Color565::WHITE));
        assert_eq!(buf.get_pixel(1, 3), Some(Color565::BLACK));
        assert_eq!(buf.get_pixel(0, 0), Some(Color565::BLACK));
        // Second glyph starts six pixels later
        assert_eq!(buf.get_pixel(8, 3), Some(Color565::WHITE));
        assert_eq!(buf.get_pixel(7, 3), Some(Color565::BLACK));
    }

    #[test]
    fn test_text_scaled() {
        let mut buf = PixelBuffer::new(32, 16);
        Gfx2D::new(&mut buf).text(0, 0, "I", Color565::WHITE, 2);
        assert_eq!(buf.get_pixel(4, 12), Some(Color565::WHITE));
        assert_eq!(buf.get_pixel(5, 13), Some(Color565::WHITE));
        assert_eq!(buf.get_pixel(1, 1), Some(Color565::BLACK));
        // Stem is 2 wide and 14 tall
        assert_eq!(count(&buf, Color565::WHITE), 2 * 14 + 4 * 4);
    }

    #[test]
    fn test_text_unknown_glyph() {
        let mut a = PixelBuffer::new(8, 8);
        let mut b = PixelBuffer::new(8, 8);
        Gfx2D::new(&mut a).text(0, 0, "\u{263a}", Color565::WHITE, 1);
        Gfx2D::new(&mut b).text(0, 0, "?", Color565::WHITE, 1);
        assert_eq!(a, b);
    }
}
