//! Scout SDK - clients for the ground-control backend
//!
//! Provides the HTTP client for the control/upload API and the rosbridge
//! telemetry subscription.

pub mod client;
pub mod telemetry;

pub use client::{GroundControlClient, KML_FORM_FIELD};
pub use telemetry::{
    RosbridgeFrame, RosbridgeRequest, TelemetryBridge, TelemetryConfig, TelemetryMount, TopicSpec,
};
