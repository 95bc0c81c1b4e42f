use ndvi_rs::index::build;
use ndvi_rs::models::{MonthSeries, RawRecord};
use ndvi_rs::trend::{line_segments, markers, summarize};

fn series_from_rows(rows: &[(i32, Option<f64>)]) -> MonthSeries {
    let records = rows
        .iter()
        .map(|&(m, v)| RawRecord::new("USA", m, v))
        .collect::<Vec<_>>();
    build(records).remove("USA").unwrap_or_default()
}

#[test]
fn mean_skips_absent_entries_in_numerator_and_denominator() {
    // [0.2, absent, 0.4, absent x9] -> (0.2 + 0.4) / 2 = 0.3
    let series = series_from_rows(&[(1, Some(0.2)), (3, Some(0.4))]);
    let summary = summarize(&series);
    assert!((summary.mean - 0.3).abs() < 1e-12);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.missing, 10);
    assert_eq!(summary.min, Some(0.2));
    assert_eq!(summary.max, Some(0.4));
}

#[test]
fn all_absent_series_reports_zero_mean() {
    let summary = summarize(&MonthSeries::empty());
    assert_eq!(summary.mean, 0.0);
    assert_eq!(summary.count, 0);
    assert_eq!(summary.missing, 12);
    assert_eq!(summary.median, None);
}

#[test]
fn explicit_empty_cells_behave_like_missing_months() {
    // A (USA, 2, empty) row is kept by the filter but contributes no value.
    let series = series_from_rows(&[(1, Some(0.5)), (2, None), (3, Some(0.7))]);
    let summary = summarize(&series);
    assert_eq!(summary.count, 2);
    assert!((summary.mean - 0.6).abs() < 1e-12);
}

#[test]
fn chart_line_breaks_across_gaps_instead_of_interpolating() {
    let series = series_from_rows(&[
        (1, Some(0.1)),
        (2, Some(0.2)),
        (4, Some(0.4)),
        (5, Some(0.5)),
    ]);
    let segments = line_segments(&series);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0], vec![(1, 0.1), (2, 0.2)]);
    assert_eq!(segments[1], vec![(4, 0.4), (5, 0.5)]);
    assert_eq!(markers(&series).len(), 4);
}

#[test]
fn isolated_points_still_get_markers() {
    let series = series_from_rows(&[(6, Some(0.33))]);
    let segments = line_segments(&series);
    assert_eq!(segments, vec![vec![(6, 0.33)]]);
    assert_eq!(markers(&series), vec![(6, 0.33)]);
}
