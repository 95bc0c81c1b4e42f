use ndvi_rs::index::{build, load_records, load_series};
use ndvi_rs::models::RawRecord;
use std::io::Write;
use tempfile::NamedTempFile;

fn rec(iso3: &str, month: i32, v: Option<f64>) -> RawRecord {
    RawRecord::new(iso3, month, v)
}

#[test]
fn build_filters_bad_codes_and_months() {
    let rows = vec![
        rec("USA", 3, Some(0.5)),
        rec("usa", 3, Some(0.5)),  // lowercase
        rec("U1A", 3, Some(0.5)),  // digit
        rec("USAX", 3, Some(0.5)), // too long
        rec("FR", 3, Some(0.5)),   // too short
        rec("FRA", 0, Some(0.5)),  // month below range
        rec("FRA", 13, Some(0.5)), // month above range
        rec("FRA", 12, Some(0.4)),
    ];
    let series = build(rows);
    assert_eq!(series.len(), 2);
    assert_eq!(series["USA"].value(3), Some(0.5));
    assert_eq!(series["FRA"].value(12), Some(0.4));
}

#[test]
fn every_series_has_twelve_slots_with_last_write_winning() {
    let series = build(vec![
        rec("USA", 3, Some(0.55)),
        rec("USA", 3, Some(0.60)),
        rec("USA", 7, Some(0.70)),
    ]);
    let usa = &series["USA"];
    assert_eq!(usa.0.len(), 12);
    assert_eq!(usa.0[2], Some(0.60));
    assert_eq!(usa.0[6], Some(0.70));
    assert_eq!(usa.defined().count(), 2);
}

#[test]
fn load_records_parses_empty_cells_as_absent_and_skips_bad_rows() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "iso3,month,ndvi_mean,extra").unwrap();
    writeln!(file, "USA,1,0.512,ignored").unwrap();
    writeln!(file, "USA,2,,ignored").unwrap();
    writeln!(file, "DEU,not-a-month,0.3,ignored").unwrap();
    writeln!(file, "KEN,4,0.8,ignored").unwrap();
    file.flush().unwrap();

    let records = load_records(file.path()).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0], RawRecord::new("USA", 1, Some(0.512)));
    assert_eq!(records[1], RawRecord::new("USA", 2, None));
    assert_eq!(records[2], RawRecord::new("KEN", 4, Some(0.8)));
}

#[test]
fn load_series_goes_end_to_end() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "iso3,month,ndvi_mean").unwrap();
    writeln!(file, "USA,3,0.55").unwrap();
    writeln!(file, "USA,3,0.60").unwrap();
    file.flush().unwrap();

    let series = load_series(file.path()).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series["USA"].0[2], Some(0.60));
}

#[test]
fn load_series_fails_on_missing_file() {
    assert!(load_series("definitely/not/here.csv").is_err());
}
