use model::{default_window, FileSource, VehicleName, VehicleSource};

fn write_feed(name: &str, contents: &str) -> String {
    let path = std::env::temp_dir().join(name);
    fs_err::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

const FEED: &str = r#"[
    {
        "vehicleNumber": "KHI-101",
        "locationUpdates": [
            { "date": "05/03/2024", "time": "11:50 AM", "latitude": 24.79, "longitude": 67.05,
              "area": "Saddar", "ignition": true, "speed": 20, "status": "moving", "distance": 1 },
            { "date": "05/03/2024", "time": "12:05 PM", "latitude": 24.80, "longitude": 67.06,
              "area": "Saddar", "ignition": true, "speed": 25, "status": "moving", "distance": 2 },
            { "date": "05/03/2024", "time": "12:30 PM", "latitude": 24.81, "longitude": 67.07,
              "area": "Clifton", "ignition": true, "speed": 30, "status": "moving", "distance": 3 }
        ]
    },
    {
        "vehicleNumber": "KHI-202",
        "locationUpdates": [
            { "date": "04/03/2024", "time": "11:55 PM", "latitude": 24.70, "longitude": 66.99,
              "area": "Lyari", "ignition": false, "speed": 0, "status": "parked", "distance": 0 },
            { "date": "05/03/2024", "time": "12:15 AM", "latitude": 24.71, "longitude": 66.98,
              "area": "Lyari", "ignition": true, "speed": 10, "status": "moving", "distance": 1 }
        ]
    },
    { "vehicleNumber": "KHI-303", "locationUpdates": [] }
]"#;

#[test]
fn feed_to_markers_and_focus() {
    let mut source = FileSource::new(write_feed("tracker_feed_end_to_end.json", FEED));
    let model = source.load().unwrap();
    assert!(!source.has_changed().unwrap());
    assert_eq!(model.vehicles.len(), 3);

    // Each vehicle is windowed against its own latest sample, even though they're hours apart
    let markers = model.markers(default_window()).unwrap();
    assert_eq!(markers.len(), 2);

    let focus = model
        .focus(&VehicleName("KHI-101".to_string()), default_window())
        .unwrap()
        .unwrap();
    assert_eq!(focus.journey.points(), &[(24.80, 67.06), (24.81, 67.07)]);
    assert!(focus.journey.to_polyline(&model.gps_bounds).is_some());

    let focus = model
        .focus(&VehicleName("KHI-202".to_string()), default_window())
        .unwrap()
        .unwrap();
    assert_eq!(focus.journey.len(), 2);

    assert!(model
        .focus(&VehicleName("KHI-303".to_string()), default_window())
        .unwrap()
        .is_none());
}

#[test]
fn csv_source() {
    let csv = "vehicle,date,time,latitude,longitude,area,ignition,speed,status,distance
KHI-101,05/03/2024,8:00 AM,24.79,67.05,Saddar,true,30,moving,1.0
KHI-101,05/03/2024,8:45 AM,24.80,67.06,Saddar,true,30,moving,2.0
";
    let mut source = FileSource::new(write_feed("tracker_feed.csv", csv));
    let model = source.load().unwrap();
    let focus = model
        .focus(&VehicleName("KHI-101".to_string()), default_window())
        .unwrap()
        .unwrap();
    assert_eq!(focus.journey.points(), &[(24.80, 67.06)]);
}

#[test]
fn reloaded_feed_with_a_bad_time_fails_the_rendering_pass() {
    let path = write_feed("tracker_feed_reload.json", FEED);
    let mut source = FileSource::new(path.clone());
    let model = source.load().unwrap();
    assert_eq!(model.markers(default_window()).unwrap().len(), 2);

    // The feed still parses, but one timestamp isn't a 12-hour time anymore
    fs_err::write(&path, FEED.replace("12:05 PM", "12:05")).unwrap();
    let model = source.load().unwrap();
    assert_eq!(model.vehicles.len(), 3);
    assert!(model.markers(default_window()).is_err());
    assert!(model
        .focus(&VehicleName("KHI-101".to_string()), default_window())
        .is_err());
    // Other vehicles can still be selected
    assert!(model
        .focus(&VehicleName("KHI-202".to_string()), default_window())
        .unwrap()
        .is_some());
}

#[test]
fn missing_file_is_an_error() {
    let mut source = FileSource::new("/definitely/not/here.json".to_string());
    assert!(source.load().is_err());
    assert!(source.has_changed().is_err());
}
