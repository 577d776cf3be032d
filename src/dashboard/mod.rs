use anyhow::{Context, Result};
use image::RgbaImage;
use rusttype::Font;

use crate::config::AppConfig;
use crate::models::{SensorReading, Viewport};
use crate::renderer::colours::Colours;
use crate::renderer::drawing::{self, RasterCanvas};
use crate::renderer::overlay;

pub fn viewport(config: &AppConfig) -> Option<Viewport> {
    if config.overlay.width == 0 || config.overlay.height == 0 {
        return None;
    }
    Some(Viewport::new(config.overlay.width, config.overlay.height))
}

// Create the overlay image for the current reading
pub fn create_image(
    config: &AppConfig,
    reading: &SensorReading,
    font: Option<&Font<'static>>,
) -> Option<RgbaImage> {
    let viewport = viewport(config)?;
    let commands = overlay::render(&config.scale(), reading, Some(viewport));

    let mut image = RgbaImage::from_pixel(
        viewport.width,
        viewport.height,
        Colours::default().background,
    );

    let mut canvas = RasterCanvas::new(&mut image, font);
    drawing::execute(&mut canvas, &commands);

    Some(image)
}

pub fn save_image(config: &AppConfig, image: &RgbaImage) -> Result<()> {
    let target = &config.overlay.file;

    image
        .save(target)
        .context(format!("Failed to save overlay to {}", target))
}
