use crate::data::bar::Bar;
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use std::path::Path;

//raw row as exported by common data downloaders: Date,Open,High,Low,Close,Volume
//fields are read as strings so junk rows (ticker headers, blank lines) can be
//skipped instead of aborting the whole file
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: String,
    #[serde(rename = "High")]
    high: String,
    #[serde(rename = "Low")]
    low: String,
    #[serde(rename = "Close")]
    close: String,
    #[serde(rename = "Volume")]
    volume: String,
}

impl CsvRecord {
    fn into_bar(self) -> Option<Bar> {
        //dates may carry a time suffix; only the leading YYYY-MM-DD matters
        let date_part = self.date.get(..10)?;
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;

        let open = self.open.trim().parse::<f64>().ok()?;
        let high = self.high.trim().parse::<f64>().ok()?;
        let low = self.low.trim().parse::<f64>().ok()?;
        let close = self.close.trim().parse::<f64>().ok()?;
        let volume = self.volume.trim().parse::<f64>().ok()?;

        Some(Bar::new(
            date.and_time(NaiveTime::MIN).and_utc(),
            open,
            high,
            low,
            close,
            volume,
        ))
    }
}

//loads daily bars from a csv file, skipping rows that do not parse
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut bars = Vec::new();

    for result in reader.deserialize() {
        let record: CsvRecord = match result {
            Ok(record) => record,
            Err(_) => continue,
        };

        if let Some(bar) = record.into_bar() {
            bars.push(bar);
        }
    }

    //sort by timestamp to ensure chronological order
    bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    Ok(bars)
}

//writes bars in the same layout load_csv reads, so cached files round-trip
pub fn write_csv<P: AsRef<Path>>(bars: &[Bar], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .context(format!("Failed to create CSV file: {:?}", path))?;

    writer.write_record(["Date", "Open", "High", "Low", "Close", "Volume"])?;

    for bar in bars {
        writer.write_record([
            bar.timestamp.format("%Y-%m-%d").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_sorts_daily_bars() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Open,High,Low,Close,Volume").unwrap();
        writeln!(file, "2023-01-04,101,103,100,102,1200").unwrap();
        writeln!(file, "2023-01-03,100,102,99,101,1000").unwrap();
        file.flush().unwrap();

        let bars = load_csv(file.path()).unwrap();
        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert_eq!(bars[0].close, 101.0);
        assert_eq!(bars[1].close, 102.0);
    }

    #[test]
    fn skips_unparseable_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Open,High,Low,Close,Volume").unwrap();
        writeln!(file, "GOOGL,GOOGL,GOOGL,GOOGL,GOOGL,GOOGL").unwrap();
        writeln!(file, "2023-01-03,100,102,99,101,1000").unwrap();
        writeln!(file, ",,,,,").unwrap();
        file.flush().unwrap();

        let bars = load_csv(file.path()).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].open, 100.0);
    }

    #[test]
    fn round_trips_through_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AAPL.csv");

        let mut src = tempfile::NamedTempFile::new().unwrap();
        writeln!(src, "Date,Open,High,Low,Close,Volume").unwrap();
        writeln!(src, "2023-01-03,100,102,99,101,1000").unwrap();
        writeln!(src, "2023-01-04,101,103,100,102.5,1200").unwrap();
        src.flush().unwrap();

        let bars = load_csv(src.path()).unwrap();
        write_csv(&bars, &path).unwrap();
        let reloaded = load_csv(&path).unwrap();
        assert_eq!(bars, reloaded);
    }
}
