use std::collections::BTreeMap;

use anyhow::Result;
use chrono::Duration;
use geom::{GPSBounds, LonLat, Pt2D};

use crate::{LocationUpdate, Model, VehicleID, VehicleName};

/// Where to draw one vehicle, and what its callout says.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub vehicle: VehicleID,
    pub name: VehicleName,
    pub latest: LocationUpdate,
}

impl Marker {
    pub fn pos(&self, gps_bounds: &GPSBounds) -> Pt2D {
        LonLat::new(self.latest.longitude, self.latest.latitude).to_pt(gps_bounds)
    }

    pub fn callout(&self) -> Vec<String> {
        vec![
            self.name.0.clone(),
            format!("Area: {}", self.latest.area),
            format!("Time: {}", self.latest.time),
            format!("Date: {}", self.latest.date),
        ]
    }
}

impl Model {
    /// One marker per vehicle, placed at the last update in its recent window. Vehicles without any
    /// updates are left out.
    pub fn markers(&self, window: Duration) -> Result<BTreeMap<VehicleID, Marker>> {
        let mut markers = BTreeMap::new();
        let mut omitted = 0;
        for vehicle in &self.vehicles {
            if vehicle.updates.is_empty() {
                omitted += 1;
                continue;
            }
            let recent = vehicle.recent_updates(window)?;
            if let Some(latest) = recent.last() {
                markers.insert(
                    vehicle.id,
                    Marker {
                        vehicle: vehicle.id,
                        name: vehicle.name.clone(),
                        latest: (*latest).clone(),
                    },
                );
            }
        }
        if omitted > 0 {
            warn!("{omitted} vehicles have no location updates and won't be shown");
        }
        Ok(markers)
    }
}
