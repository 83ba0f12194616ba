use std::collections::BTreeMap;
use std::time::SystemTime;

use anyhow::Result;
use serde::Deserialize;

use crate::{LocationUpdate, Model, VehicleName};

/// Something that can produce the current list of vehicles.
pub trait VehicleSource {
    fn load(&mut self) -> Result<Model>;

    /// True if a call to `load` would see different data than last time.
    fn has_changed(&self) -> Result<bool>;

    fn describe(&self) -> String;
}

/// Reads a JSON feed, or a CSV file if the path ends in .csv.
pub struct FileSource {
    path: String,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    pub fn new(path: String) -> Self {
        Self {
            path,
            last_modified: None,
        }
    }

    fn modified(&self) -> Result<SystemTime> {
        Ok(fs_err::metadata(&self.path)?.modified()?)
    }
}

impl VehicleSource for FileSource {
    fn load(&mut self) -> Result<Model> {
        // Record this first. If the file changes during the read, we'll just read it again later.
        let modified = self.modified()?;
        let bytes = fs_err::read(&self.path)?;
        let model = Model::load_bytes(&self.path, &bytes)?;
        self.last_modified = Some(modified);
        Ok(model)
    }

    fn has_changed(&self) -> Result<bool> {
        let modified = self.modified()?;
        Ok(self.last_modified != Some(modified))
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}

impl Model {
    /// Picks the format from the filename: CSV if it ends in .csv, JSON otherwise.
    pub fn load_bytes(filename: &str, bytes: &[u8]) -> Result<Self> {
        if filename.to_lowercase().ends_with(".csv") {
            Self::import_csv(bytes)
        } else {
            Self::from_json_bytes(bytes)
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVehicle {
    vehicle_number: VehicleName,
    #[serde(default)]
    location_updates: Vec<LocationUpdate>,
}

pub fn parse_json(bytes: &[u8]) -> Result<Vec<(VehicleName, Vec<LocationUpdate>)>> {
    let raw: Vec<RawVehicle> = serde_json::from_slice(bytes)?;
    Ok(raw
        .into_iter()
        .map(|v| (v.vehicle_number, v.location_updates))
        .collect())
}

// Rows for one vehicle don't have to be adjacent, but they should be chronological
pub fn parse_csv<R: std::io::Read>(reader: R) -> Result<Vec<(VehicleName, Vec<LocationUpdate>)>> {
    let mut vehicles: Vec<(VehicleName, Vec<LocationUpdate>)> = Vec::new();
    let mut index: BTreeMap<VehicleName, usize> = BTreeMap::new();

    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Row = rec?;
        let idx = *index.entry(rec.vehicle.clone()).or_insert_with(|| {
            vehicles.push((rec.vehicle.clone(), Vec::new()));
            vehicles.len() - 1
        });
        vehicles[idx].1.push(LocationUpdate {
            date: rec.date,
            time: rec.time,
            latitude: rec.latitude,
            longitude: rec.longitude,
            area: rec.area,
            ignition: rec.ignition,
            speed: rec.speed,
            status: rec.status,
            distance: rec.distance,
        });
    }
    Ok(vehicles)
}

#[derive(Deserialize)]
struct Row {
    vehicle: VehicleName,
    date: String,
    time: String,
    latitude: f64,
    longitude: f64,
    area: String,
    ignition: bool,
    speed: f64,
    status: String,
    distance: f64,
}
