//! Upload-then-waypoint orchestration against a mock backend.

mod support;

use scout_core::{FlightParameters, KmlFile, UploadBatch};
use std::sync::atomic::Ordering;
use support::{dead_url, dashboard_for, spawn_backend};

fn kml(name: &str) -> KmlFile {
    KmlFile::new(name, format!("<kml><name>{}</name></kml>", name).into_bytes())
}

fn names(list: &[&str]) -> Option<Vec<String>> {
    Some(list.iter().map(|s| s.to_string()).collect())
}

#[tokio::test]
async fn waypoints_follow_server_names_one_at_a_time() {
    let (url, backend) = spawn_backend().await;
    *backend.upload_names.lock().unwrap() = names(&["a_1.kml", "b_1.kml", "c_1.kml"]);
    let dashboard = dashboard_for(&url);

    dashboard.state.update(|s| {
        s.open_upload_modal();
        s.select_from_picker(vec![kml("a.kml"), kml("b.kml"), kml("c.kml")]);
    });
    dashboard.upload_selected().await;

    assert_eq!(
        *backend.waypoint_order.lock().unwrap(),
        vec!["a_1.kml", "b_1.kml", "c_1.kml"]
    );
    assert_eq!(backend.waypoint_max_in_flight.load(Ordering::SeqCst), 1);

    let log = &dashboard.log;
    let first = log.position("Sending waypoint request for KML: a_1.kml...").unwrap();
    let first_done = log.position("✅ Waypoint request sent for a_1.kml: published").unwrap();
    let second = log.position("Sending waypoint request for KML: b_1.kml...").unwrap();
    assert!(first < first_done && first_done < second);

    let state = dashboard.state.snapshot();
    assert!(!state.upload_modal_open);
    assert!(!state.uploading);
    assert!(state.selection.is_empty());
}

#[tokio::test]
async fn failed_upload_issues_no_waypoint_requests() {
    let (url, backend) = spawn_backend().await;
    let dashboard = dashboard_for(&url);

    dashboard.state.update(|s| {
        s.open_upload_modal();
        s.select_from_picker(vec![kml("field1.kml")]);
    });
    dashboard.upload_selected().await;

    assert_eq!(backend.upload_calls.load(Ordering::SeqCst), 1);
    assert!(backend.waypoint_order.lock().unwrap().is_empty());
    assert!(dashboard.log.contains("⬆️ Starting KML file upload..."));
    assert!(dashboard.log.contains("❌ KML upload failed: POST /upload-kml returned 500"));

    let state = dashboard.state.snapshot();
    assert!(state.upload_modal_open);
    assert!(!state.uploading);
    assert!(state.upload_message.starts_with("Upload failed: "));
    assert_eq!(state.selection.len(), 1);
}

#[tokio::test]
async fn empty_selection_is_rejected_without_network() {
    let (url, backend) = spawn_backend().await;
    let dashboard = dashboard_for(&url);

    dashboard.state.update(|s| {
        s.open_upload_modal();
        s.select_from_drop(vec![kml("notes.txt")]);
    });
    assert_eq!(dashboard.state.read(|s| s.upload_message.clone()), "No KML files dropped.");

    dashboard.upload_selected().await;
    assert_eq!(backend.upload_calls.load(Ordering::SeqCst), 0);
    assert!(dashboard.log.contains("Please select KML files to upload."));
    assert_eq!(
        dashboard.state.read(|s| s.upload_message.clone()),
        "Please select KML files to upload."
    );
}

#[tokio::test]
async fn modal_closes_even_when_every_waypoint_fails() {
    let (url, backend) = spawn_backend().await;
    *backend.upload_names.lock().unwrap() = names(&["x.kml", "y.kml"]);
    backend
        .failing_waypoints
        .lock()
        .unwrap()
        .extend(["x.kml".to_string(), "y.kml".to_string()]);
    let dashboard = dashboard_for(&url);

    dashboard.state.update(|s| {
        s.open_upload_modal();
        s.select_from_picker(vec![kml("x.kml"), kml("y.kml")]);
    });
    dashboard.upload_selected().await;

    assert_eq!(backend.waypoint_order.lock().unwrap().len(), 2);
    assert!(dashboard.log.contains("❌ Error sending waypoint request for x.kml:"));
    assert!(dashboard.log.contains("❌ Error sending waypoint request for y.kml:"));
    let state = dashboard.state.snapshot();
    assert!(!state.upload_modal_open);
    assert!(state.selection.is_empty());
}

#[tokio::test]
async fn two_field_scenario_logs_both_outcomes_in_order() {
    let (url, backend) = spawn_backend().await;
    *backend.upload_names.lock().unwrap() = names(&["field1_x.kml", "field2_x.kml"]);
    backend
        .failing_waypoints
        .lock()
        .unwrap()
        .insert("field1_x.kml".to_string());
    let dashboard = dashboard_for(&url);

    let batch = UploadBatch::from_picker(vec![kml("field1.kml"), kml("field2.kml")]);
    dashboard.state.update(|s| s.open_upload_modal());
    dashboard
        .mission
        .upload(&batch, &FlightParameters::default())
        .await;

    let log = &dashboard.log;
    let ok_upload = log.position("✅ KML upload successful: Files uploaded successfully.").unwrap();
    let failed = log
        .position("❌ Error sending waypoint request for field1_x.kml:")
        .unwrap();
    let succeeded = log
        .position("✅ Waypoint request sent for field2_x.kml: published")
        .unwrap();
    assert!(ok_upload < failed && failed < succeeded);
    assert_eq!(
        dashboard.state.read(|s| s.upload_message.clone()),
        "KML files uploaded successfully!"
    );
    assert!(!dashboard.state.read(|s| s.upload_modal_open));
}

#[tokio::test]
async fn unreachable_backend_is_logged_not_raised() {
    let dashboard = dashboard_for(&dead_url());
    dashboard.state.update(|s| {
        s.open_upload_modal();
        s.select_from_picker(vec![kml("field1.kml")]);
    });
    dashboard.upload_selected().await;

    assert!(dashboard.log.contains("❌ KML upload failed:"));
    assert!(dashboard.state.read(|s| s.upload_modal_open));
}
