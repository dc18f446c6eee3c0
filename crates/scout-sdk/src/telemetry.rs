//! Telemetry subscription over a rosbridge WebSocket.
//!
//! A [`TelemetryMount`] owns one connection and its two topic
//! subscriptions. Teardown (unsubscribe both topics, close the socket)
//! runs once at the end of the connection task, whichever way the mount
//! ends: [`TelemetryMount::unmount`], drop, or a remount through
//! [`TelemetryBridge`].

use futures_util::{Sink, SinkExt, StreamExt};
use scout_core::{LinkState, TelemetrySnapshot, TerminalLog};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};

/// A topic and its ROS message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSpec {
    pub name: String,
    pub message_type: String,
}

impl TopicSpec {
    pub fn new(name: impl Into<String>, message_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message_type: message_type.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub url: String,
    /// Publishes `percentage` as a 0-1 fraction.
    pub battery_topic: TopicSpec,
    /// Publishes the flight `mode` name.
    pub state_topic: TopicSpec,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:9090".to_string(),
            battery_topic: TopicSpec::new("/mavros/battery", "sensor_msgs/BatteryState"),
            state_topic: TopicSpec::new("/mavros/state", "mavros_msgs/State"),
        }
    }
}

impl TelemetryConfig {
    fn topics(&self) -> [&TopicSpec; 2] {
        [&self.battery_topic, &self.state_topic]
    }
}

// ========== ROSBRIDGE PROTOCOL ==========

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum RosbridgeRequest {
    Subscribe {
        id: String,
        topic: String,
        #[serde(rename = "type")]
        message_type: String,
    },
    Unsubscribe {
        id: String,
        topic: String,
    },
}

impl RosbridgeRequest {
    fn subscription_id(topic: &TopicSpec) -> String {
        format!("subscribe:{}", topic.name)
    }

    pub fn subscribe(topic: &TopicSpec) -> Self {
        RosbridgeRequest::Subscribe {
            id: Self::subscription_id(topic),
            topic: topic.name.clone(),
            message_type: topic.message_type.clone(),
        }
    }

    pub fn unsubscribe(topic: &TopicSpec) -> Self {
        RosbridgeRequest::Unsubscribe {
            id: Self::subscription_id(topic),
            topic: topic.name.clone(),
        }
    }
}

/// Inbound frame. Only `publish` frames are acted on.
#[derive(Debug, Clone, Deserialize)]
pub struct RosbridgeFrame {
    pub op: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub msg: Option<Value>,
}

/// Fold one inbound frame into the snapshot. Returns whether it was used.
pub fn apply_frame(
    config: &TelemetryConfig,
    frame: &RosbridgeFrame,
    snapshot: &mut TelemetrySnapshot,
) -> bool {
    if frame.op != "publish" {
        return false;
    }
    let (Some(topic), Some(msg)) = (frame.topic.as_deref(), frame.msg.as_ref()) else {
        return false;
    };

    if topic == config.battery_topic.name {
        snapshot.battery_fraction = msg.get("percentage").and_then(Value::as_f64);
        true
    } else if topic == config.state_topic.name {
        snapshot.mode = msg.get("mode").and_then(Value::as_str).map(str::to_string);
        true
    } else {
        false
    }
}

// ========== MOUNT LIFECYCLE ==========

/// Live handle to one telemetry connection.
pub struct TelemetryMount {
    snapshot: watch::Receiver<TelemetrySnapshot>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TelemetryMount {
    /// Open the connection and subscribe both topics. Requires a tokio runtime.
    pub fn start(config: TelemetryConfig, log: TerminalLog) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(TelemetrySnapshot::default());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_connection(config, log, snapshot_tx, shutdown_rx));
        Self {
            snapshot: snapshot_rx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.snapshot.borrow().clone()
    }

    /// Observer that wakes on every snapshot change.
    pub fn watch(&self) -> watch::Receiver<TelemetrySnapshot> {
        self.snapshot.clone()
    }

    /// Tear down and wait for the unsubscribe/close sequence to finish.
    pub async fn unmount(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Telemetry task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for TelemetryMount {
    fn drop(&mut self) {
        // The connection task performs the teardown on its own.
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Owner of at most one mount at a time.
pub struct TelemetryBridge {
    config: TelemetryConfig,
    log: TerminalLog,
    current: Option<TelemetryMount>,
}

impl TelemetryBridge {
    pub fn new(config: TelemetryConfig, log: TerminalLog) -> Self {
        Self {
            config,
            log,
            current: None,
        }
    }

    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.current.is_some()
    }

    /// Mount, first tearing down any existing connection.
    pub async fn mount(&mut self) -> watch::Receiver<TelemetrySnapshot> {
        self.unmount().await;
        let mount = TelemetryMount::start(self.config.clone(), self.log.clone());
        let watch = mount.watch();
        self.current = Some(mount);
        watch
    }

    pub async fn unmount(&mut self) {
        if let Some(mount) = self.current.take() {
            mount.unmount().await;
        }
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.current
            .as_ref()
            .map(TelemetryMount::snapshot)
            .unwrap_or_default()
    }
}

enum Exit {
    Unmounted,
    Closed,
    Failed(String),
}

async fn run_connection(
    config: TelemetryConfig,
    log: TerminalLog,
    snapshot: watch::Sender<TelemetrySnapshot>,
    mut shutdown: oneshot::Receiver<()>,
) {
    snapshot.send_modify(|s| s.link = LinkState::Connecting);

    let connected = tokio::select! {
        _ = &mut shutdown => None,
        result = connect_async(config.url.as_str()) => match result {
            Ok((socket, _)) => Some(socket),
            Err(e) => {
                log.append(format!("Telemetry connection error: {}", e));
                log.append("Connection to telemetry closed.");
                None
            }
        },
    };
    let Some(socket) = connected else {
        snapshot.send_modify(|s| s.link = LinkState::Disconnected);
        return;
    };

    snapshot.send_modify(|s| s.link = LinkState::Connected);
    log.append("Connected to telemetry bus.");

    let (mut sink, mut stream) = socket.split();

    let exit = 'session: {
        for topic in config.topics() {
            if let Err(e) = send_request(&mut sink, &RosbridgeRequest::subscribe(topic)).await {
                break 'session Exit::Failed(e.to_string());
            }
        }

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break 'session Exit::Unmounted,
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => handle_text(&config, &text, &snapshot),
                    Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                        Ok(text) => handle_text(&config, &text, &snapshot),
                        Err(_) => tracing::debug!("Ignoring non-UTF-8 telemetry frame"),
                    },
                    Some(Ok(Message::Close(_))) | None => break 'session Exit::Closed,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break 'session Exit::Failed(e.to_string()),
                },
            }
        }
    };

    match exit {
        Exit::Unmounted => {
            for topic in config.topics() {
                if let Err(e) = send_request(&mut sink, &RosbridgeRequest::unsubscribe(topic)).await {
                    tracing::debug!("Unsubscribe from {} failed: {}", topic.name, e);
                }
            }
            if let Err(e) = sink.close().await {
                tracing::debug!("Telemetry close failed: {}", e);
            }
        }
        Exit::Failed(e) => log.append(format!("Telemetry connection error: {}", e)),
        Exit::Closed => {}
    }

    snapshot.send_modify(|s| s.link = LinkState::Disconnected);
    log.append("Connection to telemetry closed.");
}

fn handle_text(config: &TelemetryConfig, text: &str, snapshot: &watch::Sender<TelemetrySnapshot>) {
    match serde_json::from_str::<RosbridgeFrame>(text) {
        Ok(frame) => {
            snapshot.send_if_modified(|s| apply_frame(config, &frame, s));
        }
        Err(e) => tracing::warn!("Malformed telemetry frame: {}", e),
    }
}

async fn send_request<S>(sink: &mut S, request: &RosbridgeRequest) -> Result<(), tungstenite::Error>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let text = serde_json::to_string(request).map_err(|e| {
        tungstenite::Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    sink.send(Message::Text(text)).await
}
