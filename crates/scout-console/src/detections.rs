//! Lazy, at-most-once detection metadata per gallery card.

use dashmap::DashMap;
use scout_core::{render_detection, DetectionView, TerminalLog};
use scout_sdk::GroundControlClient;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// What a card currently holds.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRecord {
    pub loaded: bool,
    pub view: DetectionView,
}

/// Card cache keyed by detection image name.
///
/// A successful fetch fills the card's cell and is never repeated for the
/// card's lifetime. A failed fetch leaves the cell empty so the next
/// interaction retries. [`reset`](Self::reset) ends every card's lifetime.
pub struct DetectionInfoCache {
    client: GroundControlClient,
    log: TerminalLog,
    cards: DashMap<String, Arc<OnceCell<DetectionView>>>,
}

impl DetectionInfoCache {
    pub fn new(client: GroundControlClient, log: TerminalLog) -> Self {
        Self {
            client,
            log,
            cards: DashMap::new(),
        }
    }

    /// Called on first interaction with a card (hover, focus, `--info`).
    pub async fn get(&self, name: &str) -> DetectionView {
        let card = self.cards.entry(name.to_string()).or_default().value().clone();

        let fetched = card
            .get_or_try_init(|| async {
                let raw = self.client.get_image_info(name).await?;
                Ok::<_, anyhow::Error>(render_detection(&raw))
            })
            .await;

        match fetched {
            Ok(view) => view.clone(),
            Err(e) => {
                tracing::warn!(image = name, "Detection info fetch failed: {:#}", e);
                self.log
                    .append(format!("❌ Failed to load detection info for {}: {}", name, e));
                DetectionView::Error
            }
        }
    }

    pub fn record(&self, name: &str) -> DetectionRecord {
        match self.cards.get(name).and_then(|card| card.get().cloned()) {
            Some(view) => DetectionRecord { loaded: true, view },
            None => DetectionRecord {
                loaded: false,
                view: DetectionView::Loading,
            },
        }
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.cards
            .get(name)
            .map(|card| card.initialized())
            .unwrap_or(false)
    }

    /// Drop every card; used when the gallery is re-populated.
    pub fn reset(&self) {
        self.cards.clear();
    }
}
