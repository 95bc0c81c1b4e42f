//! Natural Earth I projection from lon/lat degrees into a fixed map space.
//!
//! The base frame is 980 × 540 map units with the projection centered so the
//! whole world fits the frame; pan/zoom is applied later as a screen-space
//! transform and never touches these coordinates.

use crate::geo::CountryFeature;
use geo::{Area, Coord, MapCoords, MultiPolygon};

/// Width of the base map frame, in map units.
pub const MAP_WIDTH: f64 = 980.0;
/// Height of the base map frame, in map units.
pub const MAP_HEIGHT: f64 = 540.0;

/// Natural Earth I, parameterized like a d3 projection: a scale factor and a
/// translate to the frame center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaturalEarth {
    pub scale: f64,
    pub translate: (f64, f64),
}

impl Default for NaturalEarth {
    fn default() -> Self {
        Self {
            scale: 190.0,
            translate: (MAP_WIDTH / 2.0, MAP_HEIGHT / 2.0),
        }
    }
}

impl NaturalEarth {
    /// Project a lon/lat pair (degrees) to map units. Y grows downwards.
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lambda = lon.to_radians();
        let phi = lat.to_radians();
        let phi2 = phi * phi;
        let phi4 = phi2 * phi2;

        let x = lambda
            * (0.870_700 - 0.131_979 * phi2
                + phi4 * (-0.013_791 + phi4 * (0.003_971 * phi2 - 0.001_529 * phi4)));
        let y = phi
            * (1.007_226
                + phi2 * (0.015_085 + phi4 * (-0.044_475 + 0.028_874 * phi2 - 0.005_916 * phi4)));

        (
            self.translate.0 + self.scale * x,
            self.translate.1 - self.scale * y,
        )
    }
}

/// A country boundary projected into map units, ready for filling and
/// hit-testing.
#[derive(Debug, Clone)]
pub struct ProjectedCountry {
    pub iso3: Option<String>,
    pub name: String,
    pub shape: MultiPolygon<f64>,
    pub area: f64,
}

impl ProjectedCountry {
    pub fn label(&self) -> String {
        match &self.iso3 {
            Some(iso) => format!("{} ({})", self.name, iso),
            None => self.name.clone(),
        }
    }
}

/// Project every feature and sort by descending area so small countries and
/// enclaves paint after (on top of) the large ones surrounding them.
pub fn project_countries(
    features: &[CountryFeature],
    projection: &NaturalEarth,
) -> Vec<ProjectedCountry> {
    let mut projected: Vec<ProjectedCountry> = features
        .iter()
        .map(|f| {
            let shape = f.geometry.map_coords(|c: Coord<f64>| {
                let (x, y) = projection.project(c.x, c.y);
                Coord { x, y }
            });
            let area = shape.unsigned_area();
            ProjectedCountry {
                iso3: f.iso3.clone(),
                name: f.name.clone(),
                shape,
                area,
            }
        })
        .collect();
    projected.sort_by(|a, b| b.area.total_cmp(&a.area));
    projected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_the_translate_point() {
        let p = NaturalEarth::default();
        let (x, y) = p.project(0.0, 0.0);
        assert!((x - 490.0).abs() < 1e-9);
        assert!((y - 270.0).abs() < 1e-9);
    }

    #[test]
    fn x_is_monotone_in_longitude_and_y_decreases_northwards() {
        let p = NaturalEarth::default();
        let (x_west, _) = p.project(-120.0, 10.0);
        let (x_east, _) = p.project(60.0, 10.0);
        assert!(x_west < x_east);

        let (_, y_south) = p.project(10.0, -35.0);
        let (_, y_north) = p.project(10.0, 55.0);
        assert!(y_north < y_south);
    }

    #[test]
    fn projection_is_symmetric_about_the_frame_center() {
        let p = NaturalEarth::default();
        let (x_w, y_n) = p.project(-180.0, 60.0);
        let (x_e, y_s) = p.project(180.0, -60.0);
        assert!((x_w + x_e - MAP_WIDTH).abs() < 1e-9);
        assert!((y_n + y_s - MAP_HEIGHT).abs() < 1e-9);
    }

    #[test]
    fn polar_latitudes_stay_inside_the_frame_height() {
        let p = NaturalEarth::default();
        for lat in [-85.0, -60.0, 0.0, 60.0, 85.0] {
            let (_, y) = p.project(0.0, lat);
            assert!((0.0..=MAP_HEIGHT).contains(&y), "y out of frame: {y}");
        }
    }
}
