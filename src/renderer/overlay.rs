use crate::models::{SensorReading, Viewport};
use crate::renderer::colours::{Colour, Colours};

/// Geometry and range of the analog scale.
///
/// Positions are in a y-up overlay space and are measured down from the top
/// of the viewport (`height - base_y`), so only the viewport height matters.
/// The scale width is fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleConfig {
    pub min_temp: i32,
    pub max_temp: i32,
    pub start_x: f32,
    pub end_x: f32,
    pub base_y: f32,
    /// Extent of a major tick below the baseline.
    pub tick_below: f32,
    /// Height of a major tick above the baseline; medium and minor ticks use
    /// a half and a quarter of it.
    pub tick_above: f32,
    pub label_size: f32,
    pub label_offset: (f32, f32),
    pub digital_size: f32,
    pub digital_offset: (f32, f32),
    pub fill_alpha: f32,
    pub clamp_fill: bool,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            min_temp: -10,
            max_temp: 50,
            start_x: 40.0,
            end_x: 500.0,
            base_y: 100.0,
            tick_below: 3.0,
            tick_above: 10.0,
            label_size: 12.0,
            label_offset: (-2.0, -15.0),
            digital_size: 16.0,
            digital_offset: (40.0, 60.0),
            fill_alpha: 0.8,
            clamp_fill: true,
        }
    }
}

impl ScaleConfig {
    pub fn range(&self) -> f32 {
        (self.max_temp - self.min_temp) as f32
    }

    /// Horizontal distance between two adjacent degrees.
    pub fn interval(&self) -> f32 {
        (self.end_x - self.start_x) / self.range()
    }

    /// Position of `temperature` within the range, `0.0` at `min_temp` and
    /// `1.0` at `max_temp`.
    pub fn fraction(&self, temperature: f64) -> f32 {
        let fraction = ((temperature - self.min_temp as f64) / self.range() as f64) as f32;
        if self.clamp_fill {
            fraction.clamp(0.0, 1.0)
        } else {
            fraction
        }
    }

    /// Width of the fill quad for `temperature`.
    pub fn fill_extent(&self, temperature: f64) -> f32 {
        self.fraction(temperature) * (self.end_x - self.start_x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One immediate-mode drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        colour: Colour,
    },
    Quad {
        corners: [Point; 4],
        colour: Colour,
    },
    Text {
        position: Point,
        size: f32,
        text: String,
        colour: Colour,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Major,
    Medium,
    Minor,
}

pub fn classify_tick(t: i32) -> TickKind {
    if t % 10 == 0 {
        TickKind::Major
    } else if t % 5 == 0 {
        TickKind::Medium
    } else {
        TickKind::Minor
    }
}

/// Default decimal form of a reading: shortest round-trip digits, with
/// whole numbers keeping one decimal place (`20.0`, `25.937`).
pub fn format_temperature(temperature: f64) -> String {
    if temperature.is_finite() && temperature.fract() == 0.0 {
        format!("{:.1}", temperature)
    } else {
        temperature.to_string()
    }
}

/// Full overlay for `reading`. Without a viewport there is nothing to draw.
pub fn render(
    scale: &ScaleConfig,
    reading: &SensorReading,
    viewport: Option<Viewport>,
) -> Vec<DrawCommand> {
    let Some(viewport) = viewport else {
        return Vec::new();
    };
    let height = viewport.height as f32;

    let mut commands = render_digital(scale, reading.temperature, height);
    commands.extend(render_scale(scale, reading.temperature, height));
    commands
}

pub fn render_digital(
    scale: &ScaleConfig,
    temperature: f64,
    viewport_height: f32,
) -> Vec<DrawCommand> {
    let (x, y) = scale.digital_offset;
    vec![DrawCommand::Text {
        position: Point::new(x, viewport_height - y),
        size: scale.digital_size,
        text: format_temperature(temperature),
        colour: Colours::default().text,
    }]
}

pub fn render_scale(
    scale: &ScaleConfig,
    temperature: f64,
    viewport_height: f32,
) -> Vec<DrawCommand> {
    let colours = Colours::default();
    let base = viewport_height - scale.base_y;
    let interval = scale.interval();

    let tick_count = (scale.max_temp - scale.min_temp).max(0) as usize + 1;
    let mut commands = Vec::with_capacity(tick_count + 10);

    commands.push(DrawCommand::Line {
        from: Point::new(scale.start_x, base),
        to: Point::new(scale.end_x, base),
        colour: colours.scale,
    });

    for t in scale.min_temp..=scale.max_temp {
        let x = scale.start_x + interval * (t - scale.min_temp) as f32;
        match classify_tick(t) {
            TickKind::Major => {
                commands.push(DrawCommand::Line {
                    from: Point::new(x, base - scale.tick_below),
                    to: Point::new(x, base + scale.tick_above),
                    colour: colours.scale,
                });
                let (dx, dy) = scale.label_offset;
                commands.push(DrawCommand::Text {
                    position: Point::new(x + dx, base - scale.tick_below + dy),
                    size: scale.label_size,
                    text: t.to_string(),
                    colour: colours.text,
                });
            }
            TickKind::Medium => commands.push(DrawCommand::Line {
                from: Point::new(x, base),
                to: Point::new(x, base + scale.tick_above / 2.0),
                colour: colours.scale,
            }),
            TickKind::Minor => commands.push(DrawCommand::Line {
                from: Point::new(x, base),
                to: Point::new(x, base + scale.tick_above / 4.0),
                colour: colours.scale,
            }),
        }
    }

    let fraction = scale.fraction(temperature);
    let fill_end = scale.start_x + scale.fill_extent(temperature);
    let top = base + scale.tick_above;
    commands.push(DrawCommand::Quad {
        corners: [
            Point::new(scale.start_x, top),
            Point::new(scale.start_x, base),
            Point::new(fill_end, base),
            Point::new(fill_end, top),
        ],
        colour: Colours::fill(fraction, scale.fill_alpha),
    });

    commands
}
