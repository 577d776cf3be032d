/// Latest sampled temperature plus the poll loop's running flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub temperature: f64,
    pub running: bool,
}

impl Default for SensorReading {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            running: false,
        }
    }
}

impl SensorReading {
    /// Only a successfully parsed value may replace the stored one.
    pub fn update(&mut self, parsed: f64) {
        self.temperature = parsed;
    }
}

/// Size of the region the overlay is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
