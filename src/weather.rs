//! Hourly irradiance records and TMY CSV ingestion.
//!
//! Meteorological exports come in many flavours: metadata lines above the
//! header, comma or semicolon delimiters, English or Korean column names.
//! The reader locates the header row by keyword, maps columns by keyword,
//! and keeps every row whose month falls in 1..=12.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of hourly records needed to run the hourly generation mode.
pub const HOURLY_MODE_MIN_RECORDS: usize = 8000;

/// Number of leading lines searched for the header row.
const HEADER_SEARCH_LINES: usize = 50;

/// One hourly record of a typical meteorological year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrradianceRecord {
    pub year: i32,
    /// Month of year, 1..=12.
    pub month: u32,
    pub day: u32,
    /// Hour of day; values >= 24 wrap.
    pub hour: u32,
    /// Wind speed (m/s).
    pub wind_speed: f64,
    /// Global horizontal irradiance for the hour (Wh/m²).
    pub ghi: f64,
    pub wind_speed_uncertainty: f64,
    pub ghi_uncertainty: f64,
}

/// Errors raised while ingesting a TMY CSV file.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot read weather data: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed weather CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("no header row with hour and irradiance columns in the first 50 lines")]
    HeaderNotFound,
    #[error("weather CSV is missing the required {0} column")]
    MissingColumn(&'static str),
}

impl IrradianceRecord {
    /// `true` when the month lies in 1..=12.
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }
}

/// Returns `true` when `records` holds enough valid records for the hourly mode.
pub fn has_hourly_coverage(records: &[IrradianceRecord]) -> bool {
    records.iter().filter(|r| r.is_valid()).count() >= HOURLY_MODE_MIN_RECORDS
}

/// Reads a TMY CSV file from disk.
///
/// # Errors
///
/// Returns an `IngestError` if the file cannot be opened or parsed.
pub fn read_tmy_file(path: &Path) -> Result<Vec<IrradianceRecord>, IngestError> {
    let file = File::open(path)?;
    let records = read_tmy_csv(file)?;
    tracing::debug!(path = %path.display(), records = records.len(), "weather file ingested");
    Ok(records)
}

/// Parses TMY records from any reader.
///
/// Month, hour and GHI columns are mandatory. Year, day, wind speed and
/// the uncertainty columns are optional and default to zero. Cells that do
/// not parse as numbers read as zero, and rows shorter than the header are
/// skipped.
///
/// # Errors
///
/// Returns an `IngestError` if no header row is found, a mandatory column is
/// missing, or the underlying reader fails.
pub fn read_tmy_csv<R: Read>(mut reader: R) -> Result<Vec<IrradianceRecord>, IngestError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let Some((header_idx, delimiter)) = find_header(&lines) else {
        return Err(IngestError::HeaderNotFound);
    };

    let body = lines[header_idx..].join("\n");
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = rdr.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        if row.len() < headers.len() {
            continue;
        }
        let record = columns.record(&row);
        if (1..=12).contains(&record.month) {
            records.push(record);
        }
    }
    Ok(records)
}

fn find_header(lines: &[&str]) -> Option<(usize, u8)> {
    lines
        .iter()
        .take(HEADER_SEARCH_LINES)
        .enumerate()
        .find_map(|(i, line)| {
            let delimiter = if line.contains(';') { b';' } else { b',' };
            let parts: Vec<String> = line
                .split(delimiter as char)
                .map(|p| p.trim().to_lowercase())
                .collect();
            let has_time = parts
                .iter()
                .any(|p| p.contains("시간") || p.contains("hour") || p.contains("time"));
            let has_ghi = parts
                .iter()
                .any(|p| p.contains("일사량") || p.contains("ghi") || p.contains("irradiance"));
            (has_time && has_ghi).then_some((i, delimiter))
        })
}

/// Column indices resolved from the header row.
struct ColumnMap {
    year: Option<usize>,
    month: usize,
    day: Option<usize>,
    hour: usize,
    wind: Option<usize>,
    ghi: usize,
    wind_uncertainty: Option<usize>,
    ghi_uncertainty: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, IngestError> {
        let names: Vec<String> = headers.iter().map(str::to_lowercase).collect();
        let find = |keywords: &[&str]| {
            names
                .iter()
                .position(|h| keywords.iter().any(|k| h.contains(k)))
        };
        let is_uncertainty = |h: &str| h.contains("불확도") || h.contains("uncertainty");
        let find_measure = |keywords: &[&str], uncertainty: bool| {
            names.iter().position(|h| {
                keywords.iter().any(|k| h.contains(k)) && is_uncertainty(h) == uncertainty
            })
        };

        let wind_keys = ["풍속", "wind"];
        let ghi_keys = ["일사량", "ghi", "irradiance"];

        Ok(Self {
            year: find(&["년", "year"]),
            month: find(&["월", "month"]).ok_or(IngestError::MissingColumn("month"))?,
            day: find(&["일", "day"]),
            hour: find(&["시간", "hour", "time"]).ok_or(IngestError::MissingColumn("hour"))?,
            wind: find_measure(&wind_keys, false),
            ghi: find_measure(&ghi_keys, false).ok_or(IngestError::MissingColumn("ghi"))?,
            wind_uncertainty: find_measure(&wind_keys, true),
            ghi_uncertainty: find_measure(&ghi_keys, true),
        })
    }

    fn record(&self, row: &csv::StringRecord) -> IrradianceRecord {
        let num = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(0.0)
        };
        let whole = |idx: Option<usize>| num(idx).max(0.0) as u32;

        IrradianceRecord {
            year: num(self.year) as i32,
            month: whole(Some(self.month)),
            day: whole(self.day),
            hour: whole(Some(self.hour)),
            wind_speed: num(self.wind),
            ghi: num(Some(self.ghi)),
            wind_speed_uncertainty: num(self.wind_uncertainty),
            ghi_uncertainty: num(self.ghi_uncertainty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english_header_after_metadata() {
        let csv = "Site: Daejeon\nLat: 36.35\n\
                   year,month,day,hour,wind speed,GHI\n\
                   2020,1,1,12,3.1,410.5\n\
                   2020,1,1,13,2.9,455.0\n";
        let records = read_tmy_csv(csv.as_bytes()).expect("csv should parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year, 2020);
        assert_eq!(records[0].hour, 12);
        assert_eq!(records[1].ghi, 455.0);
        assert_eq!(records[1].wind_speed, 2.9);
    }

    #[test]
    fn parses_korean_semicolon_header_with_uncertainty_columns() {
        let csv = "년;월;일;시간;풍속;풍속 불확도;전일사량;전일사량 불확도\n\
                   2019;7;15;11;1.5;0.2;620.0;12.0\n";
        let records = read_tmy_csv(csv.as_bytes()).expect("csv should parse");
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!((r.month, r.day, r.hour), (7, 15, 11));
        assert_eq!(r.wind_speed, 1.5);
        assert_eq!(r.wind_speed_uncertainty, 0.2);
        assert_eq!(r.ghi, 620.0);
        assert_eq!(r.ghi_uncertainty, 12.0);
    }

    #[test]
    fn skips_out_of_range_months_and_short_rows() {
        let csv = "month,hour,ghi\n1,10,300\n13,10,300\n0,11,200\n2,9\n";
        let records = read_tmy_csv(csv.as_bytes()).expect("csv should parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].month, 1);
    }

    #[test]
    fn unparsable_cells_read_as_zero() {
        let csv = "month,hour,ghi\n3,n/a,abc\n";
        let records = read_tmy_csv(csv.as_bytes()).expect("csv should parse");
        assert_eq!(records[0].hour, 0);
        assert_eq!(records[0].ghi, 0.0);
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = read_tmy_csv("a,b,c\n1,2,3\n".as_bytes());
        assert!(matches!(err, Err(IngestError::HeaderNotFound)));
    }

    #[test]
    fn missing_month_column_is_an_error() {
        let err = read_tmy_csv("hour,ghi\n10,300\n".as_bytes());
        assert!(matches!(err, Err(IngestError::MissingColumn("month"))));
    }

    #[test]
    fn coverage_threshold() {
        let valid = IrradianceRecord {
            month: 6,
            ..IrradianceRecord::default()
        };
        let records = vec![valid.clone(); HOURLY_MODE_MIN_RECORDS - 1];
        assert!(!has_hourly_coverage(&records));
        let records = vec![valid; HOURLY_MODE_MIN_RECORDS];
        assert!(has_hourly_coverage(&records));
    }

    #[test]
    fn coverage_ignores_out_of_range_months() {
        let bad = IrradianceRecord {
            month: 0,
            ghi: 500.0,
            ..IrradianceRecord::default()
        };
        assert!(!has_hourly_coverage(&vec![bad; HOURLY_MODE_MIN_RECORDS]));
    }
}
