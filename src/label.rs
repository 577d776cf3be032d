use log::info;

/// Consumer of the current temperature, published after every sample.
pub trait TemperatureSink {
    fn publish(&mut self, temperature: f64);
}

/// Header text for a reading, e.g. `23.9°C`.
pub fn header_text(temperature: f64) -> String {
    format!("{:.1}°C", temperature)
}

/// Keeps the header label current and logs it whenever the shown text changes.
#[derive(Debug, Default)]
pub struct HeaderLabel {
    text: String,
}

impl HeaderLabel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl TemperatureSink for HeaderLabel {
    fn publish(&mut self, temperature: f64) {
        let text = header_text(temperature);
        if text != self.text {
            info!("Temperature {}", text);
            self.text = text;
        }
    }
}
