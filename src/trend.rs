//! Trend panel model: summary statistics for one country's monthly series
//! and the chart geometry for the mini line chart.

use crate::models::{MONTHS, MonthSeries};
use serde::{Deserialize, Serialize};

/// Summary statistics over the present values of a 12-entry series.
///
/// Absent entries are excluded from every statistic. `mean` defaults to 0.0
/// for an all-absent series (explicit policy: an empty mean renders as zero
/// rather than hiding the row); `min`/`max`/`median` stay `None` in that
/// case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub missing: usize,
    pub mean: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
}

/// Compute summary statistics for one country's series.
pub fn summarize(series: &MonthSeries) -> SeriesSummary {
    let mut vals: Vec<f64> = series.defined().map(|(_, v)| v).collect();
    vals.sort_by(|a, b| a.total_cmp(b));
    let count = vals.len();
    let missing = MONTHS - count;

    let mean = if count > 0 {
        vals.iter().sum::<f64>() / count as f64
    } else {
        0.0
    };
    let min = vals.first().copied();
    let max = vals.last().copied();
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };

    SeriesSummary {
        count,
        missing,
        mean,
        min,
        max,
        median,
    }
}

/// Linear domain → range mapping for chart geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Maximal runs of present values in month order.
///
/// The line connects only consecutive present months; a gap breaks the run
/// rather than interpolating across it. Single-point runs are kept so their
/// marker still gets drawn.
pub fn line_segments(series: &MonthSeries) -> Vec<Vec<(u8, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(u8, f64)> = Vec::new();
    for (i, entry) in series.0.iter().enumerate() {
        match entry {
            Some(v) => current.push((i as u8 + 1, *v)),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// One marker per present value, in month order.
pub fn markers(series: &MonthSeries) -> Vec<(u8, f64)> {
    series.defined().collect()
}
