//! End-to-end mission export tests.
//!
//! Run with: cargo test -p skyshow-core --test mission_test

use skyshow_core::geo::HomePosition;
use skyshow_core::{
    compile_mission, cue_plan, generate, load_library, save_library, waypoint_list, CueSource,
    LedChannelMap, MemoryStore, MissionDocument, MissionSettings, PatternKind, PatternParams,
    Sequence, ShowState, Waypoint,
};

fn settings() -> MissionSettings {
    MissionSettings {
        home: HomePosition {
            latitude: 37.7749,
            longitude: -122.4194,
            altitude: 0.0,
        },
        ..MissionSettings::default()
    }
}

fn three_point_show() -> Sequence {
    Sequence::empty("Three Point Show")
        .with_point(Waypoint::with_hex(200.0, 150.0, 10.0, "#ff0000"))
        .with_point(Waypoint::with_hex(220.0, 150.0, 10.0, "#00ff00"))
        .with_point(Waypoint::with_hex(240.0, 150.0, 20.0, "#0000ff"))
}

#[test]
fn test_three_point_export() {
    let seq = three_point_show();

    let text = waypoint_list(&seq, &settings());
    // header, home, three waypoints
    assert_eq!(text.lines().count(), 5);

    let first_wp: Vec<&str> = text.lines().nth(2).unwrap().split('\t').collect();
    assert_eq!(first_wp[0], "1");
    assert_eq!(first_wp[8], "37.7749000");
    assert_eq!(first_wp[9], "-122.4194000");
    assert_eq!(first_wp[10], "10.00");

    let doc = compile_mission(&seq, &settings());
    assert_eq!(doc.waypoints.len(), 3);
    assert_eq!(doc.lighting_sequence.len(), 3);
    // two segments of 1000 ms -> 10 steps -> 11 samples each, boundary kept twice
    assert_eq!(doc.color_interpolation.len(), 22);

    let last = doc.color_interpolation.last().unwrap();
    assert_eq!(last.timestamp, 2000.0);
    assert_eq!(last.color.hex, "#0000ff");
}

#[test]
fn test_geographic_offsets_move_east() {
    let doc = compile_mission(&three_point_show(), &settings());
    let lons: Vec<f64> = doc.waypoints.iter().map(|w| w.position.longitude).collect();
    assert!(lons[0] < lons[1] && lons[1] < lons[2]);

    let expected = -122.4194 + 40.0 / (111_320.0 * 37.7749_f64.to_radians().cos());
    assert!((lons[2] - expected).abs() < 1e-12);
    assert_eq!(doc.waypoints[2].position.altitude, 20.0);
}

#[test]
fn test_pattern_to_cue_plan() {
    let seq = generate(PatternKind::Heart, &PatternParams::default());
    let doc = compile_mission(&seq, &settings());

    let json = doc.to_json_pretty().unwrap();
    let reloaded = MissionDocument::from_json(&json).unwrap();

    let source = CueSource::select(&reloaded, true);
    assert_eq!(source, CueSource::Interpolated);

    let plan = cue_plan(&reloaded, source, &LedChannelMap::default());
    assert_eq!(plan.len(), reloaded.color_interpolation.len() * 3);
    assert!(plan.iter().all(|cue| (1000..=2020).contains(&cue.pulse_us)));
}

#[test]
fn test_library_survives_reload() {
    let store = MemoryStore::new();
    let now = chrono::Utc::now();

    let state = ShowState::new()
        .save(three_point_show(), now)
        .save(generate(PatternKind::Star, &PatternParams::default()), now);
    save_library(&store, state.sequences()).unwrap();

    let reloaded = ShowState::from_library(load_library(&store));
    assert_eq!(reloaded.sequences().len(), 2);
    assert_eq!(reloaded.active().map(|s| s.name.as_str()), Some("Three Point Show"));

    let first = reloaded.sequences()[0].id.clone();
    let after_delete = reloaded.delete(&first);
    assert_eq!(after_delete.active().map(|s| s.name.as_str()), Some("Star"));
}
