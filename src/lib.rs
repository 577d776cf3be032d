use crate::config::AppConfig;
use crate::label::{header_text, HeaderLabel};
use crate::models::SensorReading;
use crate::renderer::fonts;
use crate::sampler::{Event, SamplerLoop};
use anyhow::Context;
use log::{debug, error, info, warn};
use rusttype::Font;
use std::future::Future;
use std::io::{self, BufRead};
use std::thread;
use tokio::sync::mpsc;

pub mod collectors;
pub mod config;
pub mod dashboard;
pub mod label;
pub mod models;
pub mod renderer;
pub mod sampler;
pub mod utils;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting thermometer overlay");

    tokio::select! {
        result = main_loop(config) => {
            match result {
                Ok(_) => info!("Thermometer stopped"),
                Err(e) => {
                    error!("Application error: {e:#}");
                    // Print chain of error causes
                    let mut source = e.source();
                    while let Some(e) = source {
                        error!("Caused by: {e}");
                        source = e.source();
                    }
                    return Err(e).context("Application failed to run");
                }
            }
        }
    }

    Ok(())
}

async fn main_loop(config: AppConfig) -> anyhow::Result<()> {
    let font = match fonts::load_font(&config.overlay.font) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("Overlay text disabled: {e:#}");
            None
        }
    };

    let mut sampler = SamplerLoop::new(&config.sensor.bus_path, config.sensor.interval());
    sampler.add_sink(Box::new(HeaderLabel::new()));

    if config.sensor.autostart {
        sampler.toggle();
    }
    info!(
        "Control [{}]: type `toggle`, `status` or press Ctrl-C to quit",
        sampler.control_label()
    );

    let commands = spawn_stdin_reader();
    poll_loop(
        &config,
        &mut sampler,
        font.as_ref(),
        commands,
        tokio::signal::ctrl_c(),
    )
    .await
}

// Blocking stdin reads stay on their own thread so runtime shutdown never waits on them.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read control input: {e}");
                    break;
                }
            }
        }
        debug!("Control input closed");
    });
    rx
}

/// Drive the sampler until `shutdown` resolves, then stop it.
async fn poll_loop<F>(
    config: &AppConfig,
    sampler: &mut SamplerLoop,
    font: Option<&Font<'static>>,
    mut commands: mpsc::Receiver<String>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    tokio::pin!(shutdown);
    let mut commands_open = true;

    loop {
        tokio::select! {
            biased;

            result = &mut shutdown => {
                result.context("Failed to listen for Ctrl-C")?;
                if sampler.is_running() {
                    sampler.toggle();
                }
                return Ok(());
            }
            event = sampler.wait_timer() => {
                sampler.tick(&event);
                if sampler.take_redraw() {
                    redraw(config, sampler.reading(), font);
                }
            }
            line = commands.recv(), if commands_open => {
                match line {
                    Some(line) => handle_command(sampler, line.trim()),
                    None => commands_open = false,
                }
            }
        }
    }
}

fn handle_command(sampler: &mut SamplerLoop, command: &str) {
    match command {
        "toggle" | "t" => {
            sampler.toggle();
            info!("Control [{}]", sampler.control_label());
        }
        "status" | "s" => info!(
            "{} | {} | Control [{}]",
            sampler.bus_path().display(),
            header_text(sampler.reading().temperature),
            sampler.control_label()
        ),
        "" => {}
        other => {
            sampler.tick(&Event::Input(other.to_string()));
        }
    }
}

fn redraw(config: &AppConfig, reading: &SensorReading, font: Option<&Font<'static>>) {
    let Some(image) = dashboard::create_image(config, reading, font) else {
        debug!("No viewport, nothing to draw");
        return;
    };

    if config.overlay.save_to_file {
        if let Err(e) = dashboard::save_image(config, &image) {
            error!("{e:#}");
        }
    }
}
