use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Number of entries in every country series (January..December).
pub const MONTHS: usize = 12;

/// Three-letter month labels, index 0 = January.
pub const MONTH_ABBREV: [&str; MONTHS] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label for a 1-based month number. Out-of-range input is a caller bug in
/// UI code, so this clamps rather than panics.
pub fn month_abbrev(month: u8) -> &'static str {
    let idx = (month.clamp(1, MONTHS as u8) - 1) as usize;
    MONTH_ABBREV[idx]
}

/// One row of the pre-cleaned NDVI table. Additional CSV columns are
/// ignored; an empty `ndvi_mean` cell deserializes to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub iso3: String,
    pub month: i32,
    pub ndvi_mean: Option<f64>,
}

impl RawRecord {
    pub fn new(iso3: &str, month: i32, ndvi_mean: Option<f64>) -> Self {
        Self {
            iso3: iso3.to_string(),
            month,
            ndvi_mean,
        }
    }
}

/// A country's year of monthly values, index 0 = January. Absent entries are
/// `None`, never zero. Built once at load time and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSeries(pub [Option<f64>; MONTHS]);

impl MonthSeries {
    pub fn empty() -> Self {
        Self([None; MONTHS])
    }

    /// Value for a 1-based month number.
    pub fn value(&self, month: u8) -> Option<f64> {
        debug_assert!((1..=MONTHS as u8).contains(&month));
        self.0.get(month as usize - 1).copied().flatten()
    }

    /// Present values with their 1-based month numbers, in month order.
    pub fn defined(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i as u8 + 1, v)))
    }
}

impl Default for MonthSeries {
    fn default() -> Self {
        Self::empty()
    }
}

/// Lookup from ISO3 country code to its monthly series.
pub type SeriesByCountry = AHashMap<String, MonthSeries>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_abbrev_covers_range_and_clamps() {
        assert_eq!(month_abbrev(1), "Jan");
        assert_eq!(month_abbrev(12), "Dec");
        assert_eq!(month_abbrev(0), "Jan");
        assert_eq!(month_abbrev(13), "Dec");
    }

    #[test]
    fn defined_skips_absent_entries() {
        let mut s = MonthSeries::empty();
        s.0[0] = Some(0.2);
        s.0[2] = Some(0.4);
        let got: Vec<_> = s.defined().collect();
        assert_eq!(got, vec![(1, 0.2), (3, 0.4)]);
        assert_eq!(s.value(2), None);
        assert_eq!(s.value(3), Some(0.4));
    }
}
