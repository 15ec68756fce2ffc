//! Subcommand implementations

pub mod assess;
pub mod audit;
pub mod fuse;
pub mod rules;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use adaptiv_types::SensorReading;
use anyhow::Context;

/// Read JSON-lines sensor readings from a file, or stdin when `path` is `None`.
///
/// Blank lines are skipped.
pub fn read_readings(path: Option<&Path>) -> anyhow::Result<Vec<SensorReading>> {
    let reader: Box<dyn BufRead> = match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };
    parse_readings(reader)
}

fn parse_readings<R: BufRead>(reader: R) -> anyhow::Result<Vec<SensorReading>> {
    let mut readings = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reading = serde_json::from_str(&line)
            .with_context(|| format!("invalid reading on line {}", index + 1))?;
        readings.push(reading);
    }
    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_readings_applies_defaults() {
        let input = "{\"asset_id\": \"m1\", \"vib_rms\": 1.2}\n\n{\"asset_id\": \"m2\", \"vib_rms\": 2.0, \"omega\": 150, \"wear\": 0.1}\n";
        let readings = parse_readings(Cursor::new(input)).unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].omega, 100.0);
        assert_eq!(readings[0].load, 500.0);
        assert_eq!(readings[1].omega, 150.0);
        assert_eq!(readings[1].wear, 0.1);
    }

    #[test]
    fn test_parse_readings_reports_line() {
        let input = "{\"asset_id\": \"m1\", \"vib_rms\": 1.2}\nnot json\n";
        let err = parse_readings(Cursor::new(input)).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
