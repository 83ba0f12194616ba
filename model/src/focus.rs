use anyhow::Result;
use chrono::Duration;

use crate::{Journey, Model, VehicleID, VehicleName};

/// What to show after a vehicle is selected: its recent journey, with the viewport moving to where
/// that journey starts.
#[derive(Clone, Debug, PartialEq)]
pub struct Focus {
    pub vehicle: VehicleID,
    pub journey: Journey,
}

impl Model {
    /// None means there's nothing to focus on, so the caller should clear any overlay and leave
    /// the viewport alone. Malformed timestamps are still errors.
    pub fn focus(&self, name: &VehicleName, window: Duration) -> Result<Option<Focus>> {
        let vehicle = match self.lookup(name) {
            Some(v) => v,
            None => {
                warn!("Selected unknown vehicle {:?}", name);
                return Ok(None);
            }
        };
        if vehicle.updates.is_empty() {
            debug!("{:?} has no location updates", name);
            return Ok(None);
        }

        let journey = Journey::new(vehicle.recent_updates(window)?);
        if journey.is_empty() {
            return Ok(None);
        }
        Ok(Some(Focus {
            vehicle: vehicle.id,
            journey,
        }))
    }
}
