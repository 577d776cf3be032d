use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::file;

/// Marker preceding the raw reading on the last line of a `w1_slave` file.
const TEMPERATURE_MARKER: &str = "t=";

/// Failures while sampling the one-wire bus file.
///
/// Both variants are soft: the sampler keeps the previous reading and
/// tries again on the next timer tick.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to read sensor file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed sensor data: {0}")]
    Parse(String),
}

/// Read the sensor file at `path` and return its temperature in °C.
///
/// The kernel `w1_therm` driver exposes two lines; the last one ends with a
/// token such as `t=23875`, the temperature in millidegrees:
///
/// ```text
/// 72 01 4b 46 7f ff 0e 10 57 : crc=57 YES
/// 72 01 4b 46 7f ff 0e 10 57 t=23875
/// ```
pub fn read_sensor<P: AsRef<Path>>(path: P) -> Result<f64, ReadError> {
    let path = path.as_ref();
    let line = file::last_line(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match line {
        Some(line) => parse_line(&line),
        None => Err(ReadError::Parse("sensor file is empty".to_string())),
    }
}

/// Parse the full contents of a sensor file.
pub fn parse_reading(contents: &str) -> Result<f64, ReadError> {
    let line = file::last_line_of(contents)
        .ok_or_else(|| ReadError::Parse("sensor file is empty".to_string()))?;
    parse_line(line)
}

fn parse_line(line: &str) -> Result<f64, ReadError> {
    let token = line
        .split_whitespace()
        .last()
        .ok_or_else(|| ReadError::Parse("last line is blank".to_string()))?;

    let index = token
        .find(TEMPERATURE_MARKER)
        .ok_or_else(|| ReadError::Parse(format!("no `{TEMPERATURE_MARKER}` in {token:?}")))?;

    let raw = &token[index + TEMPERATURE_MARKER.len()..];
    let millidegrees = raw
        .parse::<i64>()
        .map_err(|e| ReadError::Parse(format!("bad value {raw:?}: {e}")))?;

    Ok(convert_temp_celsius(millidegrees))
}

/// Takes a raw temperature in milli-celsius and converts it to celsius.
#[inline]
fn convert_temp_celsius(millidegrees: i64) -> f64 {
    millidegrees as f64 / 1000.0
}
