use image::{Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};
use log::warn;
use rusttype::{Font, Scale};

use crate::renderer::colours::Colour;
use crate::renderer::overlay::{DrawCommand, Point};

/// Drawing primitives offered by the host surface.
///
/// Coordinates are y-up with the origin at the bottom-left corner, matching
/// the positions produced by the overlay renderer.
pub trait Canvas {
    fn line(&mut self, from: Point, to: Point, colour: Colour);
    fn quad(&mut self, corners: &[Point; 4], colour: Colour);
    fn text(&mut self, position: Point, size: f32, text: &str, colour: Colour);
}

/// Run `commands` against `canvas` in order.
pub fn execute<C: Canvas + ?Sized>(canvas: &mut C, commands: &[DrawCommand]) {
    for command in commands {
        match command {
            DrawCommand::Line { from, to, colour } => canvas.line(*from, *to, *colour),
            DrawCommand::Quad { corners, colour } => canvas.quad(corners, *colour),
            DrawCommand::Text {
                position,
                size,
                text,
                colour,
            } => canvas.text(*position, *size, text, *colour),
        }
    }
}

/// Canvas backed by an in-memory RGBA image.
pub struct RasterCanvas<'a> {
    image: &'a mut RgbaImage,
    font: Option<&'a Font<'static>>,
    warned_no_font: bool,
}

impl<'a> RasterCanvas<'a> {
    pub fn new(image: &'a mut RgbaImage, font: Option<&'a Font<'static>>) -> Self {
        Self {
            image,
            font,
            warned_no_font: false,
        }
    }

    // Overlay space is y-up, image rows grow downwards.
    fn flip(&self, y: f32) -> f32 {
        self.image.height() as f32 - y
    }
}

impl Canvas for RasterCanvas<'_> {
    fn line(&mut self, from: Point, to: Point, colour: Colour) {
        let start = (from.x, self.flip(from.y));
        let end = (to.x, self.flip(to.y));
        draw_line_segment_mut(&mut *self.image, start, end, colour.to_rgba());
    }

    fn quad(&mut self, corners: &[Point; 4], colour: Colour) {
        let (mut min_x, mut max_x) = (f32::INFINITY, f32::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
        for corner in corners {
            min_x = min_x.min(corner.x);
            max_x = max_x.max(corner.x);
            min_y = min_y.min(corner.y);
            max_y = max_y.max(corner.y);
        }

        let width = self.image.width() as f32;
        let height = self.image.height() as f32;
        let x0 = min_x.round().clamp(0.0, width) as u32;
        let x1 = max_x.round().clamp(0.0, width) as u32;
        let y0 = self.flip(max_y).round().clamp(0.0, height) as u32;
        let y1 = self.flip(min_y).round().clamp(0.0, height) as u32;

        let fill: Rgba<u8> = colour.to_rgba();
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.get_pixel_mut(x, y).blend(&fill);
            }
        }
    }

    fn text(&mut self, position: Point, size: f32, text: &str, colour: Colour) {
        let Some(font) = self.font else {
            if !self.warned_no_font {
                warn!("No font loaded, skipping overlay text");
                self.warned_no_font = true;
            }
            return;
        };

        // `position` is the baseline; the glyph box starts one size above it.
        let top = self.flip(position.y + size);
        draw_text_mut(
            &mut *self.image,
            colour.to_rgba(),
            position.x.round() as i32,
            top.round() as i32,
            Scale::uniform(size),
            font,
            text,
        );
    }
}
