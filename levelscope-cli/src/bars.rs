//! CSV bar loading.
//!
//! Expected header: `timestamp,open,high,low,close,volume`. Extra columns are
//! ignored, `#` lines are comments. Rows are sorted by timestamp and the
//! series is validated before it reaches the engine.

use anyhow::{bail, Context, Result};
use levelscope_core::domain::{parse_timestamp, validate_bars, Bar};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    /// Some vendors export fractional volume.
    volume: f64,
}

/// Load and validate a bar series from a CSV file.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open bars file {}", path.display()))?;
    let bars = read_bars(file).with_context(|| format!("read bars from {}", path.display()))?;
    tracing::debug!(path = %path.display(), bars = bars.len(), "loaded bars");
    Ok(bars)
}

/// Parse bars from any CSV reader.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut bars = Vec::new();
    for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row.with_context(|| format!("row {}", line + 1))?;
        let Some(timestamp) = parse_timestamp(&row.timestamp) else {
            bail!("row {}: unrecognised timestamp '{}'", line + 1, row.timestamp);
        };
        if !row.volume.is_finite() || row.volume < 0.0 {
            bail!("row {}: invalid volume {}", line + 1, row.volume);
        }
        bars.push(Bar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume.round() as u64,
        });
    }

    bars.sort_by_key(|b| b.timestamp);
    validate_bars(&bars)?;
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
timestamp,open,high,low,close,volume
2024-01-03,101,103,100,102,1200000
# holiday gap
2024-01-02,100,102,99,101,1000000.0
2024-01-04 15:30:00,102,104,101,103,900000
";

    #[test]
    fn reads_and_sorts() {
        let bars = read_bars(SAMPLE.as_bytes()).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].close, 101.0);
        assert_eq!(bars[0].volume, 1_000_000);
        assert_eq!(bars[2].timestamp.format("%H:%M").to_string(), "15:30");
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let bars = load_bars(file.path()).unwrap();
        assert_eq!(bars.len(), 3);
    }

    #[test]
    fn rejects_bad_timestamp() {
        let csv = "timestamp,open,high,low,close,volume\nyesterday,1,2,1,2,10\n";
        let err = read_bars(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("timestamp"));
    }

    #[test]
    fn rejects_incoherent_bar() {
        let csv = "timestamp,open,high,low,close,volume\n2024-01-02,10,9,11,10,10\n";
        assert!(read_bars(csv.as_bytes()).is_err());
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let csv = "timestamp,open,high,low,close,volume\n\
                   2024-01-02,10,11,9,10,10\n\
                   2024-01-02,10,11,9,10,10\n";
        assert!(read_bars(csv.as_bytes()).is_err());
    }

    #[test]
    fn empty_file_is_an_error() {
        let csv = "timestamp,open,high,low,close,volume\n";
        assert!(read_bars(csv.as_bytes()).is_err());
    }

    #[test]
    fn missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = load_bars(&path).unwrap_err();
        assert!(format!("{err:#}").contains("nope.csv"));
    }
}
