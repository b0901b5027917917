//! Graphics support via embedded-graphics
//!
//! This module implements the [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget)
//! trait from the embedded-graphics ecosystem for [`PixelBuffer`], so any
//! embedded-graphics drawable can render into a frame alongside [`Gfx2D`](crate::Gfx2D).
//!
//! Drawing never fails: pixels outside the buffer are skipped. Mark the
//! touched area dirty on the tile tracker as with any other drawing.
//!
//! ## Example
//!
//! ```rust
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     pixelcolor::Rgb565,
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//! use st77xx::{Color565, PixelBuffer};
//!
//! let mut frame = PixelBuffer::new(240, 135);
//!
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
//!     .draw(&mut frame);
//!
//! let _ = Circle::new(Point::new(100, 50), 40)
//!     .into_styled(PrimitiveStyle::with_stroke(Rgb565::WHITE, 2))
//!     .draw(&mut frame);
//!
//! let _ = Text::new(
//!     "Hello, ST7789!",
//!     Point::new(10, 100),
//!     MonoTextStyle::new(&FONT_6X10, Rgb565::YELLOW),
//! )
//! .draw(&mut frame);
//!
//! assert_eq!(frame.get_pixel(10, 10), Some(Color565::RED));
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point, Size},
    pixelcolor::Rgb565,
    prelude::Pixel,
    primitives::Rectangle,
};

use crate::buffer::PixelBuffer;

impl DrawTarget for PixelBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.set_pixel(x, y, color.into());
        }

        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        for y in area.top_left.y..=bottom_right.y {
            self.fill_span(y, area.top_left.x, bottom_right.x + 1, color.into());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        PixelBuffer::clear(self, color.into());
        Ok(())
    }
}

impl OriginDimensions for PixelBuffer {
    fn size(&self) -> Size {
        Size::new(u32::from(self.width()), u32::from(self.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color565;
    use embedded_graphics::{
        mono_font::{MonoTextStyle, ascii::FONT_6X10},
        prelude::*,
        primitives::{Circle, Line, PrimitiveStyle},
        text::Text,
    };

    fn count(buffer: &PixelBuffer, color: Color565) -> usize {
        buffer.as_slice().iter().filter(|&&c| c == color).count()
    }

    #[test]
    fn test_size_matches_buffer() {
        let buffer = PixelBuffer::new(240, 135);
        assert_eq!(buffer.size(), Size::new(240, 135));
    }

    #[test]
    fn test_filled_rectangle() {
        let mut buffer = PixelBuffer::new(8, 8);
        Rectangle::new(Point::new(2, 2), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut buffer)
            .unwrap();
        assert_eq!(count(&buffer, Color565::RED), 9);
        assert_eq!(buffer.get_pixel(2, 2), Some(Color565::RED));
        assert_eq!(buffer.get_pixel(4, 4), Some(Color565::RED));
        assert_eq!(buffer.get_pixel(5, 5), Some(Color565::BLACK));
    }

    #[test]
    fn test_fill_solid_clips_to_buffer() {
        let mut buffer = PixelBuffer::new(8, 8);
        buffer
            .fill_solid(
                &Rectangle::new(Point::new(-4, 6), Size::new(20, 20)),
                Rgb565::BLUE,
            )
            .unwrap();
        assert_eq!(count(&buffer, Color565::BLUE), 16);
    }

    #[test]
    fn test_out_of_bounds_pixels_are_skipped() {
        let mut buffer = PixelBuffer::new(16, 16);
        Circle::new(Point::new(-8, -8), 20)
            .into_styled(PrimitiveStyle::with_stroke(Rgb565::GREEN, 1))
            .draw(&mut buffer)
            .unwrap();
        assert!(count(&buffer, Color565::GREEN) > 0);

        Line::new(Point::new(-5, 3), Point::new(40, 3))
            .into_styled(PrimitiveStyle::with_stroke(Rgb565::WHITE, 1))
            .draw(&mut buffer)
            .unwrap();
        let row = buffer.row(3).unwrap();
        assert!(row.iter().all(|&c| c == Color565::WHITE));
    }

    #[test]
    fn test_clear_and_text() {
        let mut buffer = PixelBuffer::new(64, 16);
        DrawTarget::clear(&mut buffer, Rgb565::BLUE).unwrap();
        assert_eq!(count(&buffer, Color565::BLUE), 64 * 16);

        Text::new(
            "Hi",
            Point::new(0, 10),
            MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE),
        )
        .draw(&mut buffer)
        .unwrap();
        assert!(count(&buffer, Color565::WHITE) > 0);
    }
}
