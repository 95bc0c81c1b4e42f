use crate::models::MonthSeries;
use crate::trend::SeriesSummary;
use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save one country's 12-month series as CSV with header.
pub fn save_country_csv<P: AsRef<Path>>(iso3: &str, series: &MonthSeries, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("iso3", "month", "ndvi_mean"))?;
    for (i, value) in series.0.iter().enumerate() {
        wtr.serialize((iso3, i as u8 + 1, value))?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct CountryExport<'a> {
    iso3: &'a str,
    name: &'a str,
    ndvi_mean: &'a [Option<f64>],
    summary: &'a SeriesSummary,
}

/// Save one country's series plus its summary as pretty JSON.
pub fn save_country_json<P: AsRef<Path>>(
    iso3: &str,
    name: &str,
    series: &MonthSeries,
    summary: &SeriesSummary,
    path: P,
) -> Result<()> {
    let export = CountryExport {
        iso3,
        name,
        ndvi_mean: &series.0,
        summary,
    };
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&export)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::summarize;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");

        let mut series = MonthSeries::empty();
        series.0[2] = Some(0.42);
        let summary = summarize(&series);

        save_country_csv("USA", &series, &csvp).unwrap();
        save_country_json("USA", "United States", &series, &summary, &jsonp).unwrap();

        let csv_text = std::fs::read_to_string(&csvp).unwrap();
        assert!(csv_text.starts_with("iso3,month,ndvi_mean"));
        assert_eq!(csv_text.lines().count(), 13);
        assert!(csv_text.contains("USA,3,0.42"));

        let json_text = std::fs::read_to_string(&jsonp).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json_text).unwrap();
        assert_eq!(value["iso3"], "USA");
        assert_eq!(value["ndvi_mean"][2], 0.42);
        assert_eq!(value["summary"]["count"], 1);
    }
}
