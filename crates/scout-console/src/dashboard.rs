//! Composition root: one session log, one state container, every component.

use crate::commands::CommandDispatcher;
use crate::config::Config;
use crate::gallery::DetectionGallery;
use crate::map::MapBridge;
use crate::mission::MissionUploadOrchestrator;
use crate::state::SharedState;
use anyhow::{Context, Result};
use scout_core::{KmlFile, TelemetrySnapshot, TerminalLog};
use scout_sdk::{GroundControlClient, TelemetryBridge};
use std::path::Path;
use tokio::sync::watch;

pub const BANNER: &str = "Ready to process AI detection...";

pub struct Dashboard {
    pub log: TerminalLog,
    pub state: SharedState,
    pub client: GroundControlClient,
    pub commands: CommandDispatcher,
    pub mission: MissionUploadOrchestrator,
    pub map: MapBridge,
    pub gallery: DetectionGallery,
    pub telemetry: TelemetryBridge,
}

impl Dashboard {
    pub fn new(config: &Config) -> Self {
        let log = TerminalLog::with_banner(BANNER);
        let state = SharedState::default();
        let client = GroundControlClient::new(config.api_url.clone());

        Self {
            commands: CommandDispatcher::new(client.clone(), log.clone(), state.clone()),
            mission: MissionUploadOrchestrator::new(client.clone(), log.clone(), state.clone()),
            map: MapBridge::new(client.map_url(), log.clone()),
            gallery: DetectionGallery::new(
                client.clone(),
                log.clone(),
                state.clone(),
                config.ai_refresh_delay,
            ),
            telemetry: TelemetryBridge::new(config.telemetry.clone(), log.clone()),
            log,
            state,
            client,
        }
    }

    /// Upload whatever is currently selected with the current parameters.
    pub async fn upload_selected(&self) {
        let (batch, params) = self
            .state
            .read(|s| (s.selection.clone(), s.flight_params.clone()));
        self.mission.upload(&batch, &params).await;
    }

    pub async fn mount_telemetry(&mut self) -> watch::Receiver<TelemetrySnapshot> {
        self.telemetry.mount().await
    }

    /// Release the telemetry connection, if any.
    pub async fn shutdown(&mut self) {
        self.telemetry.unmount().await;
    }
}

/// Read mission geometry files from disk, keeping the order given.
pub async fn load_kml_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<KmlFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let contents = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        files.push(KmlFile::new(name, contents));
    }
    Ok(files)
}
