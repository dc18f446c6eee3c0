//! In-process control API used by the console integration tests.
#![allow(dead_code)]

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use scout_console::{Config, Dashboard};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
pub struct Backend {
    /// Names returned by /upload-kml; `None` makes the upload step fail.
    pub upload_names: Mutex<Option<Vec<String>>>,
    pub upload_calls: AtomicUsize,
    /// Waypoint filenames answered with 500.
    pub failing_waypoints: Mutex<HashSet<String>>,
    pub waypoint_order: Mutex<Vec<String>>,
    pub waypoint_in_flight: AtomicUsize,
    pub waypoint_max_in_flight: AtomicUsize,
    /// Per-command artificial latency.
    pub command_delay: Mutex<HashMap<String, Duration>>,
    pub command_completions: Mutex<Vec<String>>,
    pub info_hits: Mutex<HashMap<String, usize>>,
    /// Image names whose first info fetch fails.
    pub flaky_info: Mutex<HashSet<String>>,
    pub images: Mutex<Vec<String>>,
    pub image_list_calls: AtomicUsize,
}

impl Backend {
    pub fn info_hits(&self, name: &str) -> usize {
        self.info_hits.lock().unwrap().get(name).copied().unwrap_or(0)
    }
}

async fn upload_kml(State(backend): State<Arc<Backend>>, mut multipart: Multipart) -> Response {
    backend.upload_calls.fetch_add(1, Ordering::SeqCst);
    while let Some(field) = multipart.next_field().await.unwrap() {
        let _ = field.bytes().await.unwrap();
    }
    let names = backend.upload_names.lock().unwrap().clone();
    match names {
        Some(names) => Json(json!({
            "message": "Files uploaded successfully.",
            "uploadedFileNames": names,
        }))
        .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "disk full").into_response(),
    }
}

async fn generate_waypoint(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> Response {
    let filename = body["filename"].as_str().unwrap_or_default().to_string();
    let now = backend.waypoint_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    backend.waypoint_max_in_flight.fetch_max(now, Ordering::SeqCst);
    backend.waypoint_order.lock().unwrap().push(filename.clone());

    tokio::time::sleep(Duration::from_millis(20)).await;
    backend.waypoint_in_flight.fetch_sub(1, Ordering::SeqCst);

    if backend.failing_waypoints.lock().unwrap().contains(&filename) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({"status": "published", "kml": body["params"]["kml_file"]})).into_response()
}

async fn send_command(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    let command = body["command"].as_str().unwrap_or_default().to_string();
    let delay = backend.command_delay.lock().unwrap().get(&command).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    backend.command_completions.lock().unwrap().push(command.clone());

    if command == "land" {
        return Json(json!({"status": "error", "message": "Vehicle is not armed"})).into_response();
    }
    Json(json!({"status": "success", "message": format!("Command '{}' sent to ROS2.", command)}))
        .into_response()
}

async fn image_info(State(backend): State<Arc<Backend>>, Path(name): Path<String>) -> Response {
    let hits = {
        let mut hits = backend.info_hits.lock().unwrap();
        let entry = hits.entry(name.clone()).or_default();
        *entry += 1;
        *entry
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    if hits == 1 && backend.flaky_info.lock().unwrap().contains(&name) {
        return StatusCode::BAD_GATEWAY.into_response();
    }
    if name == "empty.jpg" {
        return Json(json!({})).into_response();
    }
    if name == "absent.jpg" {
        return (StatusCode::NOT_FOUND, Json(json!({}))).into_response();
    }
    Json(json!({
        "class_name": "person",
        "confidence": 0.91,
        "Crop Path": format!("/srv/crops/{}", name),
    }))
    .into_response()
}

async fn list_images(State(backend): State<Arc<Backend>>) -> Response {
    backend.image_list_calls.fetch_add(1, Ordering::SeqCst);
    let images = backend.images.lock().unwrap().clone();
    Json(json!({"imageUrls": images})).into_response()
}

pub async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/ai-images", get(list_images))
        .route("/get-image-info/:name", get(image_info))
        .route("/upload-kml", post(upload_kml))
        .route("/generate_waypoint", post(generate_waypoint))
        .route("/send_mission_command", post(send_command))
        .route(
            "/run-ai-script",
            post(|| async { Json(json!({"status": "success", "output": "2 detections"})) }),
        )
        .route(
            "/reload-ai-data",
            post(|| async { Json(json!({"status": "success"})) }),
        )
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), backend)
}

pub fn dashboard_for(base_url: &str) -> Dashboard {
    let config = Config {
        api_url: base_url.to_string(),
        ai_refresh_delay: Duration::from_millis(50),
        ..Config::default()
    };
    Dashboard::new(&config)
}

/// Base URL with nothing listening behind it.
pub fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    format!("http://{}", listener.local_addr().unwrap())
}
