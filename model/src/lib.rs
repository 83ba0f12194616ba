#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod feed;
mod focus;
mod journey;
mod markers;
mod timestamp;
mod window;

use anyhow::Result;
use chrono::Duration;
use geom::{Bounds, GPSBounds, LonLat};
use serde::{Deserialize, Serialize};

pub use self::feed::{FileSource, VehicleSource};
pub use self::focus::Focus;
pub use self::journey::Journey;
pub use self::markers::Marker;
pub use self::timestamp::{parse_date, parse_time, parse_timestamp};
pub use self::window::{recent_updates, window_from_minutes};

/// How far back from a vehicle's latest sample its journey reaches.
pub fn default_window() -> Duration {
    Duration::minutes(30)
}

/// Where the map starts when there's nothing to show yet. (latitude, longitude)
pub const DEFAULT_CENTER: (f64, f64) = (24.8007, 67.0711);

/// The vehicle number used by the external feed
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VehicleName(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VehicleID(pub usize);

pub struct Model {
    pub bounds: Bounds,
    pub gps_bounds: GPSBounds,
    // Indexed by VehicleID
    pub vehicles: Vec<Vehicle>,
}

pub struct Vehicle {
    pub id: VehicleID,
    pub name: VehicleName,
    // Assumed chronological, as the feed delivers them
    pub updates: Vec<LocationUpdate>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    /// dd/mm/yyyy
    pub date: String,
    /// 12-hour clock, like "4:05 PM"
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub area: String,
    pub ignition: bool,
    pub speed: f64,
    pub status: String,
    pub distance: f64,
}

impl LocationUpdate {
    pub fn lon_lat(&self) -> LonLat {
        LonLat::new(self.longitude, self.latitude)
    }
}

impl Model {
    pub fn new(vehicles: Vec<(VehicleName, Vec<LocationUpdate>)>) -> Self {
        let mut gps_bounds = GPSBounds::new();
        for (_, updates) in &vehicles {
            for update in updates {
                pad_bounds(&mut gps_bounds, update.lon_lat());
            }
        }
        if vehicles.iter().all(|(_, updates)| updates.is_empty()) {
            let (lat, lon) = DEFAULT_CENTER;
            pad_bounds(&mut gps_bounds, LonLat::new(lon, lat));
        }

        let vehicles = vehicles
            .into_iter()
            .enumerate()
            .map(|(idx, (name, updates))| Vehicle {
                id: VehicleID(idx),
                name,
                updates,
            })
            .collect();
        Self {
            bounds: gps_bounds.to_bounds(),
            gps_bounds,
            vehicles,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        let vehicles = feed::parse_json(bytes)?;
        let model = Self::new(vehicles);
        model.log_summary();
        Ok(model)
    }

    pub fn import_csv<R: std::io::Read>(reader: R) -> Result<Self> {
        let vehicles = feed::parse_csv(reader)?;
        let model = Self::new(vehicles);
        model.log_summary();
        Ok(model)
    }

    pub fn lookup(&self, name: &VehicleName) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| &v.name == name)
    }

    fn log_summary(&self) {
        let updates: usize = self.vehicles.iter().map(|v| v.updates.len()).sum();
        info!(
            "Loaded {} vehicles with {} location updates",
            self.vehicles.len(),
            updates
        );
    }
}

// A single sample (or a parked fleet) would otherwise have zero-sized bounds, which the canvas
// can't handle
fn pad_bounds(gps_bounds: &mut GPSBounds, pt: LonLat) {
    let pad = 0.005;
    gps_bounds.update(LonLat::new(pt.x() - pad, pt.y() - pad));
    gps_bounds.update(LonLat::new(pt.x() + pad, pt.y() + pad));
}

impl Vehicle {
    /// The updates inside the trailing window, anchored at this vehicle's latest sample. Fails if
    /// there are no updates at all, or if any timestamp is malformed.
    pub fn recent_updates(&self, window: Duration) -> Result<Vec<&LocationUpdate>> {
        recent_updates(&self.updates, window)
    }
}
