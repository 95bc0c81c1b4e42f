//! ndvi-rs
//!
//! A lightweight Rust library for joining, visualizing, and summarizing
//! monthly country NDVI data. Pairs with the `ndvi-gui` choropleth viewer.
//!
//! ### Features
//! - Index a pre-cleaned NDVI table into fixed 12-month series per country
//! - Load world boundary features and report join coverage by ISO3 code
//! - Sequential color scale with an explicit no-data sentinel
//! - Natural Earth projection, choropleth rasterization, and hit-testing
//! - Per-country trend summaries (count, missing, min, max, mean, median)
//! - CSV/JSON export of a selected country's series
//!
//! ### Example
//! ```no_run
//! use ndvi_rs::{geo, index, trend};
//!
//! let series = index::load_series("data/ndvi_country_2024_clean.csv")?;
//! let features = geo::load_features("data/world.geojson")?;
//! geo::join_coverage(&features, &series).log();
//!
//! let summary = trend::summarize(&series["USA"]);
//! println!("{:#?}", summary);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod color;
pub mod geo;
pub mod index;
pub mod map;
pub mod models;
pub mod project;
pub mod state;
pub mod storage;
pub mod trend;

pub use color::{NO_DATA, Rgb, color_for};
pub use geo::{CountryFeature, JoinReport};
pub use models::{MonthSeries, RawRecord, SeriesByCountry};
pub use state::{AppState, Event};
