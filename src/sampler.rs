use log::{debug, info};
use std::future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::collectors::onewire;
use crate::label::TemperatureSink;
use crate::models::SensorReading;

/// Something that woke the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Timer,
    Input(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The loop is not running; no further ticks will be scheduled.
    Finished,
    /// Not a timer event, nothing happened.
    PassThrough,
    /// The sensor was sampled and a redraw requested.
    Sampled,
}

// Timer plus redraw hook. At most one exists per sampler.
struct Session {
    timer: Interval,
    redraw_pending: bool,
}

/// Timer-driven poll loop owning the current [`SensorReading`].
pub struct SamplerLoop {
    bus_path: PathBuf,
    interval: Duration,
    reading: SensorReading,
    session: Option<Session>,
    sinks: Vec<Box<dyn TemperatureSink>>,
}

impl SamplerLoop {
    pub fn new<P: Into<PathBuf>>(bus_path: P, interval: Duration) -> Self {
        Self {
            bus_path: bus_path.into(),
            interval,
            reading: SensorReading::default(),
            session: None,
            sinks: Vec::new(),
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn TemperatureSink>) {
        self.sinks.push(sink);
    }

    pub fn bus_path(&self) -> &Path {
        &self.bus_path
    }

    pub fn reading(&self) -> &SensorReading {
        &self.reading
    }

    pub fn is_running(&self) -> bool {
        self.reading.running
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Label for the start/stop control.
    pub fn control_label(&self) -> &'static str {
        if self.reading.running {
            "Stop"
        } else {
            "Start"
        }
    }

    /// Start polling. Invoked while already running this stops instead.
    ///
    /// Returns the running state after the call. Must be called from within
    /// a tokio runtime.
    pub fn start(&mut self) -> bool {
        if self.reading.running {
            self.stop();
            return false;
        }

        self.reading.running = true;
        if self.session.is_none() {
            let mut timer = time::interval_at(Instant::now() + self.interval, self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            self.session = Some(Session {
                timer,
                redraw_pending: false,
            });
            info!(
                "Polling {} every {} ms",
                self.bus_path.display(),
                self.interval.as_millis()
            );
        }
        true
    }

    pub fn stop(&mut self) {
        self.reading.running = false;
        if self.session.take().is_some() {
            info!("Stopped polling {}", self.bus_path.display());
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.start()
    }

    pub fn tick(&mut self, event: &Event) -> TickOutcome {
        if !self.reading.running {
            self.session = None;
            return TickOutcome::Finished;
        }

        if *event != Event::Timer {
            return TickOutcome::PassThrough;
        }

        if let Some(session) = self.session.as_mut() {
            session.redraw_pending = true;
        }

        match onewire::read_sensor(&self.bus_path) {
            Ok(temperature) => self.reading.update(temperature),
            Err(e) => debug!(
                "Keeping {} after failed sample: {}",
                self.reading.temperature, e
            ),
        }

        let temperature = self.reading.temperature;
        for sink in self.sinks.iter_mut() {
            sink.publish(temperature);
        }

        TickOutcome::Sampled
    }

    /// Wait for the next timer firing. Never resolves while stopped.
    pub async fn wait_timer(&mut self) -> Event {
        match self.session.as_mut() {
            Some(session) => {
                session.timer.tick().await;
                Event::Timer
            }
            None => future::pending().await,
        }
    }

    /// Whether a redraw was requested since the last call.
    pub fn take_redraw(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => std::mem::take(&mut session.redraw_pending),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Viewport;
    use crate::renderer::overlay::{self, DrawCommand, Point, ScaleConfig};
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;

    struct Recorder(Arc<Mutex<Vec<f64>>>);

    impl TemperatureSink for Recorder {
        fn publish(&mut self, temperature: f64) {
            self.0.lock().unwrap().push(temperature);
        }
    }

    fn sensor_file(contents: &str) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), contents).unwrap();
        file
    }

    fn sampler(file: &NamedTempFile) -> SamplerLoop {
        SamplerLoop::new(file.path(), Duration::from_millis(100))
    }

    #[test]
    fn test_initial_state() {
        let sampler = SamplerLoop::new("/tmp/bus.txt", Duration::from_millis(100));
        assert_eq!(*sampler.reading(), SensorReading::default());
        assert!(!sampler.is_running());
        assert!(!sampler.has_session());
        assert_eq!(sampler.control_label(), "Start");
        assert_eq!(sampler.bus_path(), Path::new("/tmp/bus.txt"));
    }

    #[tokio::test]
    async fn test_toggle_twice_returns_to_idle() {
        let file = sensor_file("00 t=20000\n");
        let mut sampler = sampler(&file);

        assert!(sampler.toggle());
        assert!(sampler.is_running());
        assert!(sampler.has_session());
        assert_eq!(sampler.control_label(), "Stop");

        assert!(!sampler.toggle());
        assert!(!sampler.is_running());
        assert!(!sampler.has_session());
        assert!(!sampler.take_redraw());
        assert_eq!(sampler.control_label(), "Start");
    }

    #[tokio::test]
    async fn test_start_while_running_stops() {
        let file = sensor_file("00 t=20000\n");
        let mut sampler = sampler(&file);

        assert!(sampler.start());
        assert!(!sampler.start());
        assert!(!sampler.has_session());
    }

    #[tokio::test]
    async fn test_timer_tick_samples_and_requests_redraw() {
        let file = sensor_file("4b 01 : crc=e1 YES\n4b 01 t=25937\n");
        let mut sampler = sampler(&file);
        sampler.start();

        assert_eq!(sampler.tick(&Event::Timer), TickOutcome::Sampled);
        assert_eq!(sampler.reading().temperature, 25.937);
        assert!(sampler.take_redraw());
        assert!(!sampler.take_redraw());
    }

    #[tokio::test]
    async fn test_sampled_reading_renders_digital_readout() {
        let file = sensor_file("4b 01 : crc=e1 YES\n4b 01 t=25937\n");
        let mut sampler = sampler(&file);
        sampler.start();
        sampler.tick(&Event::Timer);
        assert!(sampler.take_redraw());

        let viewport = Viewport::new(640, 480);
        let scale = ScaleConfig::default();
        let commands = overlay::render(&scale, sampler.reading(), Some(viewport));

        match &commands[0] {
            DrawCommand::Text { position, text, .. } => {
                assert_eq!(text, "25.937");
                assert_eq!(*position, Point::new(40.0, 480.0 - 60.0));
            }
            other => panic!("expected the digital readout first, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_data_keeps_previous_value() {
        let file = sensor_file("00 t=20000\n");
        let mut sampler = sampler(&file);
        sampler.start();
        sampler.tick(&Event::Timer);
        assert_eq!(sampler.reading().temperature, 20.0);

        fs::write(file.path(), "00 : crc=00 NO\n").unwrap();
        assert_eq!(sampler.tick(&Event::Timer), TickOutcome::Sampled);
        assert_eq!(sampler.reading().temperature, 20.0);

        fs::write(file.path(), "00 t=garbage\n").unwrap();
        sampler.tick(&Event::Timer);
        assert_eq!(sampler.reading().temperature, 20.0);
        assert!(sampler.is_running());
    }

    #[tokio::test]
    async fn test_missing_file_keeps_previous_value() {
        let file = sensor_file("00 t=20000\n");
        let path = file.path().to_path_buf();
        let mut sampler = sampler(&file);
        sampler.start();
        sampler.tick(&Event::Timer);

        drop(file);
        assert!(!path.exists());
        assert_eq!(sampler.tick(&Event::Timer), TickOutcome::Sampled);
        assert_eq!(sampler.reading().temperature, 20.0);
        assert!(sampler.is_running());
    }

    #[tokio::test]
    async fn test_non_timer_event_passes_through() {
        let file = sensor_file("00 t=20000\n");
        let mut sampler = sampler(&file);
        sampler.start();

        let outcome = sampler.tick(&Event::Input("mouse move".to_string()));
        assert_eq!(outcome, TickOutcome::PassThrough);
        assert_eq!(sampler.reading().temperature, 0.0);
        assert!(!sampler.take_redraw());
        assert!(sampler.is_running());
    }

    #[tokio::test]
    async fn test_tick_after_stop_finishes() {
        let file = sensor_file("00 t=20000\n");
        let mut sampler = sampler(&file);
        sampler.start();
        sampler.stop();

        assert_eq!(sampler.tick(&Event::Timer), TickOutcome::Finished);
        assert_eq!(sampler.reading().temperature, 0.0);
        assert!(!sampler.has_session());
    }

    #[test]
    fn test_tick_while_idle_finishes() {
        let mut sampler = SamplerLoop::new("/tmp/bus.txt", Duration::from_millis(100));
        assert_eq!(sampler.tick(&Event::Timer), TickOutcome::Finished);
        assert!(!sampler.take_redraw());
    }

    #[tokio::test]
    async fn test_sinks_receive_current_value() {
        let file = sensor_file("00 t=21500\n");
        let published = Arc::new(Mutex::new(Vec::new()));
        let mut sampler = sampler(&file);
        sampler.add_sink(Box::new(Recorder(published.clone())));
        sampler.start();

        sampler.tick(&Event::Timer);
        fs::write(file.path(), "").unwrap();
        sampler.tick(&Event::Timer);
        sampler.tick(&Event::Input("key".to_string()));

        assert_eq!(*published.lock().unwrap(), vec![21.5, 21.5]);
    }

    #[tokio::test]
    async fn test_wait_timer_fires_while_running() {
        let file = sensor_file("00 t=20000\n");
        let mut sampler = SamplerLoop::new(file.path(), Duration::from_millis(10));
        sampler.start();

        let event = time::timeout(Duration::from_secs(2), sampler.wait_timer())
            .await
            .expect("timer should fire");
        assert_eq!(event, Event::Timer);
    }

    #[tokio::test]
    async fn test_wait_timer_pending_while_stopped() {
        let mut sampler = SamplerLoop::new("/tmp/bus.txt", Duration::from_millis(10));
        let waited = time::timeout(Duration::from_millis(50), sampler.wait_timer()).await;
        assert!(waited.is_err());
    }
}
