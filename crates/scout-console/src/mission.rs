//! Two-phase mission upload: geometry first, then one waypoint request per file.

use crate::state::SharedState;
use scout_core::{FlightParameters, TerminalLog, UploadBatch};
use scout_sdk::GroundControlClient;

pub struct MissionUploadOrchestrator {
    client: GroundControlClient,
    log: TerminalLog,
    state: SharedState,
}

impl MissionUploadOrchestrator {
    pub fn new(client: GroundControlClient, log: TerminalLog, state: SharedState) -> Self {
        Self { client, log, state }
    }

    /// Upload `batch`, then request waypoints for each server-named file in order.
    ///
    /// Failures are reported to the terminal log only. If the upload step
    /// fails no waypoint request is issued and the modal stays open;
    /// otherwise the modal is dismissed once the loop ends.
    pub async fn upload(&self, batch: &UploadBatch, params: &FlightParameters) {
        if batch.is_empty() {
            self.state.update(|s| s.upload_rejected_empty());
            self.log.append("Please select KML files to upload.");
            return;
        }

        self.state.update(|s| s.upload_started());
        self.log.append("⬆️ Starting KML file upload...");

        let uploaded = match self.client.upload_kml(batch).await {
            Ok(result) => result,
            Err(e) => {
                let reason = e.to_string();
                self.log.append(format!("❌ KML upload failed: {}", reason));
                self.state.update(|s| s.upload_failed(&reason));
                return;
            }
        };

        self.log
            .append(format!("✅ KML upload successful: {}", uploaded.message));
        self.state.update(|s| s.upload_accepted());

        // Each request completes before the next starts.
        for name in &uploaded.uploaded_file_names {
            self.log
                .append(format!("Sending waypoint request for KML: {}...", name));
            match self.client.generate_waypoint(name, params).await {
                Ok(response) => {
                    self.log.append(format!(
                        "✅ Waypoint request sent for {}: {}",
                        name,
                        response.status.unwrap_or_default()
                    ));
                }
                Err(e) => {
                    tracing::debug!(file = %name, "Waypoint request failed: {:#}", e);
                    self.log
                        .append(format!("❌ Error sending waypoint request for {}: {}", name, e));
                }
            }
        }

        self.state.update(|s| s.upload_finished());
    }
}
