//! Core data models shared by the SDK and the console.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Flight-control command understood by `/send_mission_command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroneCommand {
    Arm,
    Disarm,
    /// Return to launch
    Rtl,
    Land,
    MissionStart,
}

impl DroneCommand {
    pub const ALL: [DroneCommand; 5] = [
        DroneCommand::Arm,
        DroneCommand::Disarm,
        DroneCommand::Rtl,
        DroneCommand::Land,
        DroneCommand::MissionStart,
    ];

    /// Wire tag sent as the `command` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            DroneCommand::Arm => "arm",
            DroneCommand::Disarm => "disarm",
            DroneCommand::Rtl => "rtl",
            DroneCommand::Land => "land",
            DroneCommand::MissionStart => "mission_start",
        }
    }
}

impl fmt::Display for DroneCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown drone command: {0}")]
pub struct CommandParseError(pub String);

impl FromStr for DroneCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "arm" => Ok(DroneCommand::Arm),
            "disarm" => Ok(DroneCommand::Disarm),
            "rtl" | "return_to_launch" => Ok(DroneCommand::Rtl),
            "land" => Ok(DroneCommand::Land),
            "mission_start" => Ok(DroneCommand::MissionStart),
            _ => Err(CommandParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandRequest {
    pub command: DroneCommand,
}

/// Reply from `/send_mission_command`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

/// Reply from `/run-ai-script` and `/reload-ai-data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ScriptResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageListResponse {
    #[serde(rename = "imageUrls", default)]
    pub image_urls: Vec<String>,
}

/// Result of the multipart upload step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub message: String,
    /// Server-assigned names, authoritative for the waypoint loop.
    #[serde(rename = "uploadedFileNames", default)]
    pub uploaded_file_names: Vec<String>,
}

/// Reply from `/generate_waypoint`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaypointResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Directive posted to the embedded map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum MapDirective {
    #[serde(rename = "showAll")]
    ShowAll,
    #[serde(rename = "centerView")]
    CenterView,
}

/// Link state of the telemetry subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Live view of the vehicle as reported on the telemetry bus.
///
/// `mode` and `battery_fraction` arrive on separate topics and are not
/// updated together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub link: LinkState,
    pub mode: Option<String>,
    pub battery_fraction: Option<f64>,
}

impl TelemetrySnapshot {
    pub fn connected(&self) -> bool {
        self.link == LinkState::Connected
    }

    /// Battery as a percentage string, e.g. `87.5%`, or `---` when unknown.
    pub fn battery_display(&self) -> String {
        match self.battery_fraction {
            Some(fraction) => format!("{:.1}%", fraction * 100.0),
            None => "---".to_string(),
        }
    }

    pub fn mode_display(&self) -> &str {
        self.mode.as_deref().filter(|m| !m.is_empty()).unwrap_or("---")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serializes_to_wire_tag() {
        let body = serde_json::to_value(CommandRequest {
            command: DroneCommand::MissionStart,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"command": "mission_start"}));
        assert_eq!(DroneCommand::Rtl.to_string(), "rtl");
    }

    #[test]
    fn command_parses_cli_spellings() {
        assert_eq!("mission-start".parse::<DroneCommand>().unwrap(), DroneCommand::MissionStart);
        assert_eq!("ARM".parse::<DroneCommand>().unwrap(), DroneCommand::Arm);
        assert!("takeoff".parse::<DroneCommand>().is_err());
    }

    #[test]
    fn map_directive_uses_action_tag() {
        assert_eq!(
            serde_json::to_string(&MapDirective::ShowAll).unwrap(),
            r#"{"action":"showAll"}"#
        );
        let parsed: MapDirective = serde_json::from_str(r#"{"action":"centerView"}"#).unwrap();
        assert_eq!(parsed, MapDirective::CenterView);
    }

    #[test]
    fn snapshot_display_placeholders() {
        let mut snapshot = TelemetrySnapshot::default();
        assert!(!snapshot.connected());
        assert_eq!(snapshot.battery_display(), "---");
        assert_eq!(snapshot.mode_display(), "---");

        snapshot.battery_fraction = Some(0.875);
        snapshot.mode = Some("AUTO.MISSION".into());
        assert_eq!(snapshot.battery_display(), "87.5%");
        assert_eq!(snapshot.mode_display(), "AUTO.MISSION");
    }

    #[test]
    fn upload_result_reads_camel_case_names() {
        let result: UploadResult = serde_json::from_str(
            r#"{"message":"ok","uploadedFileNames":["a.kml","b.kml"]}"#,
        )
        .unwrap();
        assert_eq!(result.uploaded_file_names, vec!["a.kml", "b.kml"]);
    }
}
