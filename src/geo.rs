//! Country boundary registry: load a GeoJSON FeatureCollection and expose
//! one feature per country, keyed by its ISO3 identifier for joining against
//! the monthly series lookup.
//!
//! The boundary source's identifier scheme is expected to match the tabular
//! file's `iso3` values; mismatches are tolerated and reported through
//! [`JoinReport`], never fatal.

use crate::models::SeriesByCountry;
use anyhow::{Context, Result};
use geo::MultiPolygon;
use geojson::GeoJson;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Structural problems in the boundary file that cannot be skipped per
/// feature.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("boundary source must be a GeoJSON FeatureCollection")]
    NotFeatureCollection,
}

/// One country boundary. `iso3` is `None` when the source feature carries no
/// identifier; such features render but are permanently unjoinable.
#[derive(Debug, Clone)]
pub struct CountryFeature {
    pub iso3: Option<String>,
    pub name: String,
    /// Boundary rings in lon/lat degrees.
    pub geometry: MultiPolygon<f64>,
}

impl CountryFeature {
    /// `"Name (ISO)"` label used in diagnostics and the trend panel title.
    pub fn label(&self) -> String {
        match &self.iso3 {
            Some(iso) => format!("{} ({})", self.name, iso),
            None => self.name.clone(),
        }
    }
}

/// Parse a GeoJSON FeatureCollection into country features.
///
/// Feature identifiers are read from the feature-level `id`; display names
/// from the `name` property. Non-polygonal or geometry-less features are
/// skipped.
pub fn parse_features(raw: &str) -> Result<Vec<CountryFeature>> {
    let geojson: GeoJson = raw.parse().context("failed to parse boundary GeoJSON")?;
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(GeoError::NotFeatureCollection.into()),
    };

    let mut features = Vec::new();
    for feature in collection.features {
        let iso3 = match &feature.id {
            Some(geojson::feature::Id::String(s)) => Some(s.clone()),
            Some(geojson::feature::Id::Number(n)) => Some(n.to_string()),
            None => None,
        };

        let name = feature
            .properties
            .as_ref()
            .and_then(|props| props.get("name"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| iso3.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let geometry = match feature.geometry {
            Some(g) => {
                let converted: geo::Geometry<f64> = match g.value.try_into() {
                    Ok(geom) => geom,
                    Err(_) => continue,
                };
                match converted {
                    geo::Geometry::MultiPolygon(mp) => mp,
                    geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
                    _ => continue,
                }
            }
            None => continue,
        };

        features.push(CountryFeature {
            iso3,
            name,
            geometry,
        });
    }
    Ok(features)
}

/// Load boundaries from a local file path or an http(s) URL.
pub fn load_features(source: &str) -> Result<Vec<CountryFeature>> {
    let raw = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_boundaries(source)?
    } else {
        fs::read_to_string(Path::new(source))
            .with_context(|| format!("failed to read boundary file {source:?}"))?
    };
    let features = parse_features(&raw)?;
    log::info!("loaded {} boundary features from {source}", features.len());
    Ok(features)
}

fn fetch_boundaries(url: &str) -> Result<String> {
    let http = HttpClient::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(5))
        .user_agent(concat!("ndvi_rs/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("reqwest client build")?;
    let response = http
        .get(url)
        .send()
        .with_context(|| format!("failed to fetch boundaries from {url}"))?
        .error_for_status()
        .context("boundary request failed")?;
    response.text().context("failed to read boundary body")
}

/// Outcome of joining boundary features against the series lookup by ISO3.
///
/// Absence is an expected outcome on both sides of the join, so the
/// unmatched set is data, not an error: tests assert on it directly and the
/// GUI logs it once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinReport {
    /// Features whose identifier has a series.
    pub matched: usize,
    /// Labels of features with no identifier or no matching series.
    pub unmatched: Vec<String>,
}

/// Check every feature's identifier against the series lookup.
pub fn join_coverage(features: &[CountryFeature], series: &SeriesByCountry) -> JoinReport {
    let mut matched = 0;
    let mut unmatched = Vec::new();
    for feature in features {
        match feature.iso3.as_deref() {
            Some(iso) if series.contains_key(iso) => matched += 1,
            _ => unmatched.push(feature.label()),
        }
    }
    JoinReport { matched, unmatched }
}

impl JoinReport {
    /// Non-fatal diagnostic: list every boundary with no matching series.
    pub fn log(&self) {
        if self.unmatched.is_empty() {
            log::info!("all {} boundary features have series data", self.matched);
        } else {
            log::warn!(
                "{} of {} boundary features have no matching series: {}",
                self.unmatched.len(),
                self.matched + self.unmatched.len(),
                self.unmatched.join(", ")
            );
        }
    }
}
