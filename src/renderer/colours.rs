use image::Rgba;

/// RGBA colour with float channels, as handed to the overlay canvas.
///
/// Channels are nominally in `[0, 1]`, but an unclamped fill can push them
/// outside; conversion to pixels saturates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Colour {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([channel(self.r), channel(self.g), channel(self.b), channel(self.a)])
    }
}

pub struct Colours {
    pub text: Colour,
    pub scale: Colour,
    pub background: Rgba<u8>,
}

impl Default for Colours {
    fn default() -> Self {
        Self {
            text: Colour::new(1.0, 1.0, 1.0, 1.0),  // White - readout and labels
            scale: Colour::new(1.0, 1.0, 1.0, 1.0), // White - baseline and ticks
            background: Rgba([0, 0, 0, 255]),
        }
    }
}

impl Colours {
    /// Fill colour for a position in the scale: blue when cold, red when hot.
    pub fn fill(fraction: f32, alpha: f32) -> Colour {
        Colour::new(fraction, 0.0, 1.0 - fraction, alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_gradient() {
        assert_eq!(Colours::fill(0.0, 0.8), Colour::new(0.0, 0.0, 1.0, 0.8));
        assert_eq!(Colours::fill(1.0, 0.8), Colour::new(1.0, 0.0, 0.0, 0.8));
        assert_eq!(Colours::fill(0.25, 0.8).b, 0.75);
    }

    #[test]
    fn test_to_rgba_saturates() {
        assert_eq!(Colour::new(1.0, 0.0, 1.0, 0.8).to_rgba(), Rgba([255, 0, 255, 204]));
        assert_eq!(Colour::new(-0.1, 0.5, 1.1, 1.0).to_rgba(), Rgba([0, 128, 255, 255]));
    }
}
