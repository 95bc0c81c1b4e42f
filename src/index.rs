//! Build the country-code → monthly-series lookup from raw tabular rows.
//!
//! The input file is a pre-cleaned batch export, so malformed rows (bad
//! country code, out-of-range month, undeserializable cells) are filtered
//! out silently instead of being surfaced as errors. File-level I/O problems
//! are still fatal.

use crate::models::{MONTHS, MonthSeries, RawRecord, SeriesByCountry};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static ISO3_RE: OnceLock<Regex> = OnceLock::new();

fn iso3_re() -> &'static Regex {
    ISO3_RE.get_or_init(|| Regex::new(r"^[A-Z]{3}$").unwrap())
}

/// Does a row pass the country-code and month-range invariants?
fn is_valid(record: &RawRecord) -> bool {
    iso3_re().is_match(&record.iso3) && (1..=MONTHS as i32).contains(&record.month)
}

/// Read raw rows from a CSV file with `iso3`, `month`, `ndvi_mean` columns.
///
/// Rows that fail to deserialize are skipped; the file must at least open
/// and contain a header row.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("failed to open NDVI table {:?}", path))?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in rdr.deserialize::<RawRecord>() {
        match row {
            Ok(r) => records.push(r),
            Err(_) => skipped += 1,
        }
    }
    if skipped > 0 {
        log::debug!("skipped {skipped} undeserializable rows in {:?}", path);
    }
    Ok(records)
}

/// Group valid rows by country code into fixed 12-entry series.
///
/// Duplicate (country, month) pairs are last-write-wins, including an
/// explicit empty cell overwriting an earlier value. Months with no
/// contributing row stay absent.
pub fn build<I>(records: I) -> SeriesByCountry
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut by_iso = SeriesByCountry::new();
    for record in records.into_iter().filter(is_valid) {
        let series = by_iso
            .entry(record.iso3)
            .or_insert_with(MonthSeries::empty);
        series.0[record.month as usize - 1] = record.ndvi_mean;
    }
    by_iso
}

/// Load a CSV file and build the series lookup in one step.
pub fn load_series<P: AsRef<Path>>(path: P) -> Result<SeriesByCountry> {
    let records = load_records(path)?;
    let series = build(records);
    log::info!("indexed monthly series for {} countries", series.len());
    Ok(series)
}
