use log::debug;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

/// Last line of a small text file, if it has any lines at all.
pub fn last_line<P: AsRef<Path>>(path: P) -> io::Result<Option<String>> {
    let start = Instant::now();
    let contents = fs::read_to_string(path)?;
    let line = last_line_of(&contents).map(str::to_string);
    debug!("last_line took: {} ms", start.elapsed().as_millis());
    Ok(line)
}

// A trailing newline does not count as an empty final line.
pub fn last_line_of(contents: &str) -> Option<&str> {
    contents.lines().last()
}
