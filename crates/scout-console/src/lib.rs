//! Scout Console - the ground-control dashboard's orchestration core.
//!
//! Each component catches its own failures and reports them as lines in the
//! shared [`TerminalLog`](scout_core::TerminalLog); nothing here returns an
//! error to the operator surface.

pub mod commands;
pub mod config;
pub mod dashboard;
pub mod detections;
pub mod gallery;
pub mod map;
pub mod mission;
pub mod state;

pub use commands::CommandDispatcher;
pub use config::Config;
pub use dashboard::{load_kml_files, Dashboard, BANNER};
pub use detections::{DetectionInfoCache, DetectionRecord};
pub use gallery::DetectionGallery;
pub use map::{MapBridge, MapSurface};
pub use mission::MissionUploadOrchestrator;
pub use state::SharedState;
