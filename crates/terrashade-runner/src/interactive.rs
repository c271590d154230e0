//! Line-driven front end: each `lat lon radius` line triggers one run.

use crate::controls::{parse_latitude, parse_longitude, parse_radius};
use crate::session::{Session, SessionRecord};
use std::io::{self, BufRead, Write};
use terrashade_dem::ElevationSource;
use terrashade_render::Renderer;
use tracing::debug;

/// Prompt printed before each line is read.
pub const PROMPT: &str = "lat lon radius> ";

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Trigger a run for the given center and radius (miles, clamped).
    Run { lat: f64, lon: f64, radius: f64 },
    /// Show the last successful run.
    Last,
    /// Leave the loop.
    Quit,
    /// Blank line; nothing to do.
    Empty,
}

/// Parse a line. Fields may be separated by whitespace or commas.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    match line {
        "" => return Ok(Command::Empty),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "last" => return Ok(Command::Last),
        _ => {}
    }

    let fields: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|f| !f.is_empty())
        .collect();
    let [lat, lon, radius] = fields.as_slice() else {
        return Err(format!(
            "expected 'lat lon radius', 'last' or 'quit', got {} field(s)",
            fields.len()
        ));
    };

    Ok(Command::Run {
        lat: parse_latitude(lat)?,
        lon: parse_longitude(lon)?,
        radius: parse_radius(radius)?,
    })
}

/// Human-readable summary of a run: the display surface of the terminal front end.
pub fn describe_record(record: &SessionRecord) -> String {
    let (rows, cols) = record.grid.shape();
    let elevation = match record.grid.min_max() {
        Some((lo, hi)) => format!("{:.1}..{:.1} m", lo, hi),
        None => "no data".to_string(),
    };
    let mut summary = format!(
        "({:.5}, {:.5}) r={} mi: {}x{} grid, elevation {}",
        record.query.center_lat,
        record.query.center_lon,
        record.query.radius_miles,
        rows,
        cols,
        elevation
    );
    let missing = record.grid.missing_count();
    if missing > 0 {
        summary.push_str(&format!(", {} missing", missing));
    }
    summary.push_str(&format!("\nImage: {}", record.image.path.display()));
    summary
}

/// Read commands from `input` until `quit` or end of input.
///
/// Failed runs are reported on `output` and the loop keeps going.
pub fn run_interactive<S, R, I, W>(
    session: &mut Session<S, R>,
    input: I,
    mut output: W,
) -> io::Result<()>
where
    S: ElevationSource,
    R: Renderer,
    I: BufRead,
    W: Write,
{
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        debug!("Input line: {:?}", line);

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Empty) => {}
            Ok(Command::Last) => match session.current() {
                Some(record) => writeln!(output, "{}", describe_record(record))?,
                None => writeln!(output, "No successful run yet")?,
            },
            Ok(Command::Run { lat, lon, radius }) => {
                writeln!(output, "Fetching elevation data...")?;
                match session.run(lat, lon, radius) {
                    Ok(record) => writeln!(output, "{}", describe_record(record))?,
                    Err(e) => writeln!(output, "Error: {}", e)?,
                }
            }
            Err(msg) => writeln!(output, "Error: {}", msg)?,
        }

        write!(output, "{}", PROMPT)?;
        output.flush()?;
    }

    Ok(())
}
