//! Directives to the embedded map surface.

use scout_core::{MapDirective, TerminalLog};
use tokio::sync::broadcast;

const DIRECTIVE_CAPACITY: usize = 16;

/// Posts map directives to whichever surfaces are attached.
///
/// Delivery is fire-and-forget. With no surface attached a directive is
/// dropped, never queued.
#[derive(Clone)]
pub struct MapBridge {
    map_url: String,
    log: TerminalLog,
    bus: broadcast::Sender<MapDirective>,
}

impl MapBridge {
    pub fn new(map_url: impl Into<String>, log: TerminalLog) -> Self {
        let (bus, _) = broadcast::channel(DIRECTIVE_CAPACITY);
        Self {
            map_url: map_url.into(),
            log,
            bus,
        }
    }

    /// Embed address of the map surface.
    pub fn map_url(&self) -> &str {
        &self.map_url
    }

    /// Attach a surface; it sees directives posted from now on.
    pub fn attach(&self) -> MapSurface {
        MapSurface {
            rx: self.bus.subscribe(),
        }
    }

    pub fn surfaces(&self) -> usize {
        self.bus.receiver_count()
    }

    pub fn show_all(&self) -> bool {
        self.log.append("📍 Showing all detections on map...");
        self.post(MapDirective::ShowAll)
    }

    pub fn center_view(&self) -> bool {
        self.log.append("🎯 Centering map view...");
        self.post(MapDirective::CenterView)
    }

    /// Returns whether any surface received the directive.
    fn post(&self, directive: MapDirective) -> bool {
        match self.bus.send(directive) {
            Ok(surfaces) => {
                tracing::debug!(?directive, surfaces, "Map directive posted");
                true
            }
            Err(_) => {
                tracing::debug!(?directive, "No map surface attached, directive dropped");
                false
            }
        }
    }
}

/// Receiving end held by an embedded map.
pub struct MapSurface {
    rx: broadcast::Receiver<MapDirective>,
}

impl MapSurface {
    /// Next directive, or `None` once the bridge is gone.
    pub async fn next(&mut self) -> Option<MapDirective> {
        loop {
            match self.rx.recv().await {
                Ok(directive) => return Some(directive),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Map surface lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn try_next(&mut self) -> Option<MapDirective> {
        loop {
            match self.rx.try_recv() {
                Ok(directive) => return Some(directive),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}
