//! Choropleth model: per-country fill colors for a selected month, raster
//! rendering of the country shapes, pointer hit-testing, and the animated
//! fill transition driven by the month scrubber.

use crate::color::{self, Rgb};
use crate::models::SeriesByCountry;
use crate::project::ProjectedCountry;
use anyhow::Result;
use geo::{Contains, Point};
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;

/// Ocean / frame background behind the country shapes.
pub const BACKGROUND: Rgb = Rgb::new(0x0e, 0x16, 0x33);
/// Country outline stroke.
pub const STROKE: Rgb = Rgb::new(0x1e, 0x2a, 0x4f);
/// Fill transition length in seconds; long enough to read as a smooth ramp
/// while continuously scrubbing.
pub const TRANSITION_SECS: f64 = 0.35;

/// One fill per country for the selected month: the joined series value fed
/// through the color scale, with unjoinable countries and absent months
/// both landing on the no-data color.
pub fn fill_colors(
    countries: &[ProjectedCountry],
    series: &SeriesByCountry,
    month: u8,
) -> Vec<Rgb> {
    countries
        .iter()
        .map(|c| {
            let value = c
                .iso3
                .as_deref()
                .and_then(|iso| series.get(iso))
                .and_then(|s| s.value(month));
            color::color_for(value)
        })
        .collect()
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

/// Rasterize the choropleth into an RGB888 frame buffer.
///
/// `frame` must hold `width * height * 3` bytes; `raster_scale` maps map
/// units to pixels. Countries are drawn in slice order (already sorted
/// largest-first), exterior rings filled, all rings stroked.
pub fn rasterize(
    countries: &[ProjectedCountry],
    fills: &[Rgb],
    frame: &mut [u8],
    width: u32,
    height: u32,
    raster_scale: f64,
) -> Result<()> {
    debug_assert_eq!(countries.len(), fills.len());
    let root = BitMapBackend::with_buffer(frame, (width, height)).into_drawing_area();
    root.fill(&rgb(BACKGROUND))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let px = |x: f64, y: f64| ((x * raster_scale) as i32, (y * raster_scale) as i32);

    for (country, fill) in countries.iter().zip(fills) {
        let fill_style = rgb(*fill).filled();
        let stroke_style = ShapeStyle {
            color: rgb(STROKE).to_rgba(),
            filled: false,
            stroke_width: 1,
        };
        for polygon in &country.shape {
            let ring: Vec<(i32, i32)> = polygon
                .exterior()
                .coords()
                .map(|c| px(c.x, c.y))
                .collect();
            if ring.len() < 3 {
                continue;
            }
            root.draw(&Polygon::new(ring.clone(), fill_style))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            root.draw(&PathElement::new(ring, stroke_style))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
    }
    root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

/// Find the country under a map-space point.
///
/// All containing shapes are considered and the smallest-area one wins, so
/// an enclave is picked over the country surrounding it.
pub fn hit_test(countries: &[ProjectedCountry], x: f64, y: f64) -> Option<usize> {
    let point = Point::new(x, y);
    countries
        .iter()
        .enumerate()
        .filter(|(_, c)| c.shape.contains(&point))
        .min_by(|(_, a), (_, b)| a.area.total_cmp(&b.area))
        .map(|(i, _)| i)
}

/// An in-flight animated fill change.
///
/// `from` snapshots whatever was on screen when the change was triggered, so
/// starting a new transition mid-flight continues from the blended state and
/// the scrubber's latest value wins.
#[derive(Debug, Clone)]
pub struct FillTransition {
    from: Vec<Rgb>,
    started: f64,
    duration: f64,
}

impl FillTransition {
    /// Begin a transition at time `now` (seconds, any monotonic clock).
    pub fn new(from: Vec<Rgb>, now: f64) -> Self {
        Self {
            from,
            started: now,
            duration: TRANSITION_SECS,
        }
    }

    /// Fraction completed at `now`, clamped to [0, 1].
    pub fn progress(&self, now: f64) -> f64 {
        ((now - self.started) / self.duration).clamp(0.0, 1.0)
    }

    pub fn finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    /// Blend towards `target`; returns exactly `target` once finished so no
    /// stale colors survive the transition.
    pub fn blend(&self, target: &[Rgb], now: f64) -> Vec<Rgb> {
        let t = self.progress(now);
        if t >= 1.0 || self.from.len() != target.len() {
            return target.to_vec();
        }
        self.from
            .iter()
            .zip(target)
            .map(|(a, b)| a.lerp(*b, t))
            .collect()
    }
}
