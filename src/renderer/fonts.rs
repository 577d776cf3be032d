use anyhow::{anyhow, Context, Result};
use rusttype::Font;
use std::fs;
use std::path::Path;

pub fn load_font<P: AsRef<Path>>(path: P) -> Result<Font<'static>> {
    let path = path.as_ref();
    let bytes = fs::read(path).context(format!("Failed to read font {}", path.display()))?;
    Font::try_from_vec(bytes)
        .ok_or_else(|| anyhow!("{} is not a usable TrueType font", path.display()))
}
