use geom::{Distance, GPSBounds, LonLat, PolyLine, Pt2D};

use crate::LocationUpdate;

/// The recent path of one vehicle, as (latitude, longitude) pairs in the order they were reported.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Journey {
    points: Vec<(f64, f64)>,
}

impl Journey {
    pub fn new<'a, I: IntoIterator<Item = &'a LocationUpdate>>(updates: I) -> Self {
        Self {
            points: updates
                .into_iter()
                .map(|u| (u.latitude, u.longitude))
                .collect(),
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Where the journey starts, as (latitude, longitude)
    pub fn start(&self) -> Option<(f64, f64)> {
        self.points.first().copied()
    }

    pub fn start_pt(&self, gps_bounds: &GPSBounds) -> Option<Pt2D> {
        self.start().map(|(lat, lon)| LonLat::new(lon, lat).to_pt(gps_bounds))
    }

    pub fn to_pts(&self, gps_bounds: &GPSBounds) -> Vec<Pt2D> {
        self.points
            .iter()
            .map(|(lat, lon)| LonLat::new(*lon, *lat).to_pt(gps_bounds))
            .collect()
    }

    /// None if the vehicle hasn't really moved; a polyline needs two distinct points.
    pub fn to_polyline(&self, gps_bounds: &GPSBounds) -> Option<PolyLine> {
        // GPS jitter while parked produces lots of nearly equal points
        let pts = Pt2D::approx_dedupe(self.to_pts(gps_bounds), Distance::meters(1.0));
        PolyLine::new(pts).ok()
    }
}
