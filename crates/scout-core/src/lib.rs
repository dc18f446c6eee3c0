//! Scout Core - shared models and state for the ground-control console.
//!
//! Holds the wire models for the control API, flight parameters, the
//! detection display transform, the session terminal log and the dashboard
//! state container. No I/O lives here.

pub mod detection;
pub mod models;
pub mod params;
pub mod state;
pub mod terminal;
pub mod upload;

pub use detection::{display_key, render_detection, DetectionView, INTERNAL_PATH_KEY};
pub use models::{
    CommandParseError, CommandRequest, CommandResponse, DroneCommand, ImageListResponse,
    LinkState, MapDirective, ScriptResponse, TelemetrySnapshot, UploadResult, WaypointResponse,
};
pub use params::{
    FlightParam, FlightParameters, ParamError, ParamValue, WaypointParams, WaypointRequest,
};
pub use state::{DashboardState, Pane, Theme};
pub use terminal::{TerminalEntry, TerminalLog, TerminalTail};
pub use upload::{KmlFile, SelectionSource, UploadBatch};
