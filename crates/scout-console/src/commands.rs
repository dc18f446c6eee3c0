//! Fire-and-forget flight-control commands.

use crate::state::SharedState;
use scout_core::{DroneCommand, TerminalLog};
use scout_sdk::GroundControlClient;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct CommandDispatcher {
    client: GroundControlClient,
    log: TerminalLog,
    state: SharedState,
}

impl CommandDispatcher {
    pub fn new(client: GroundControlClient, log: TerminalLog, state: SharedState) -> Self {
        Self { client, log, state }
    }

    /// Issue a command in the background.
    ///
    /// Every call is an independent request: no retries, no de-duplication,
    /// and completion order across calls is not guaranteed. The handle only
    /// lets callers wait; the outcome lives in the terminal log.
    pub fn send(&self, command: DroneCommand) -> JoinHandle<()> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.dispatch(command).await })
    }

    pub async fn dispatch(&self, command: DroneCommand) {
        self.log
            .append(format!("Sending drone command: {}...", command));

        match self.client.send_command(command).await {
            Ok(response) if response.is_success() => {
                self.log.append(format!(
                    "✅ Drone command '{}' successful: {}",
                    command,
                    response.message.unwrap_or_default()
                ));
            }
            Ok(response) => {
                self.log.append(format!(
                    "❌ Drone command '{}' failed: {}",
                    command,
                    response.message.unwrap_or_default()
                ));
            }
            Err(e) => {
                self.log
                    .append(format!("❌ Error sending drone command '{}': {}", command, e));
            }
        }
    }

    /// Mission-start button: same endpoint, separate flag and wording.
    pub async fn start_mission(&self) {
        self.state.update(|s| s.set_mission_loading(true));
        self.log.append("🎯 Starting mission...");

        match self.client.send_command(DroneCommand::MissionStart).await {
            Ok(response) if response.is_success() => {
                self.log.append(format!(
                    "✅ Mission started successfully!\n{}",
                    response.message.unwrap_or_default()
                ));
            }
            Ok(response) => {
                self.log.append(format!(
                    "❌ Mission start failed: {}",
                    response.message.unwrap_or_default()
                ));
            }
            Err(e) => {
                self.log.append(format!("❌ Error starting mission: {}", e));
            }
        }

        self.state.update(|s| s.set_mission_loading(false));
    }
}
