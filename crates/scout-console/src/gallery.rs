//! AI detection gallery: image list, AI pipeline triggers and card details.

use crate::detections::DetectionInfoCache;
use crate::state::SharedState;
use scout_core::{DetectionView, TerminalLog};
use scout_sdk::GroundControlClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct DetectionGallery {
    client: GroundControlClient,
    log: TerminalLog,
    state: SharedState,
    cache: Arc<DetectionInfoCache>,
    refresh_delay: Duration,
}

impl DetectionGallery {
    pub fn new(
        client: GroundControlClient,
        log: TerminalLog,
        state: SharedState,
        refresh_delay: Duration,
    ) -> Self {
        let cache = Arc::new(DetectionInfoCache::new(client.clone(), log.clone()));
        Self {
            client,
            log,
            state,
            cache,
            refresh_delay,
        }
    }

    pub fn cache(&self) -> &DetectionInfoCache {
        &self.cache
    }

    /// Re-list detection crops. A new list is a view reset: every card's
    /// cached details are discarded. Returns the listed names.
    pub async fn refresh(&self) -> Option<Vec<String>> {
        match self.client.list_ai_images().await {
            Ok(names) => {
                let urls = names
                    .iter()
                    .map(|name| self.client.image_url(name))
                    .collect();
                self.cache.reset();
                self.state.update(|s| s.set_images(urls));
                tracing::debug!(count = names.len(), "Gallery refreshed");
                Some(names)
            }
            Err(e) => {
                tracing::warn!("Listing AI images failed: {:#}", e);
                self.log
                    .append("❌ Error loading AI images. Please check connection.");
                None
            }
        }
    }

    /// Card details for one image name.
    pub async fn inspect(&self, name: &str) -> DetectionView {
        self.cache.get(name).await
    }

    /// Run the backend detection script. On success a refresh is scheduled
    /// after the configured delay; its handle is returned.
    pub async fn run_ai_script(&self) -> Option<JoinHandle<()>> {
        self.state.update(|s| s.set_ai_loading(true));
        self.log.append("🚀 Initializing AI processing...");

        let scheduled = match self.client.run_ai_script().await {
            Ok(response) if response.is_success() => {
                self.log.append(format!(
                    "✅ AI processing completed successfully!\n{}",
                    response.output.unwrap_or_default()
                ));
                let gallery = self.clone();
                Some(tokio::spawn(async move {
                    tokio::time::sleep(gallery.refresh_delay).await;
                    gallery.refresh().await;
                }))
            }
            Ok(response) => {
                self.log.append(format!(
                    "❌ AI processing failed: {}",
                    response.message.unwrap_or_default()
                ));
                None
            }
            Err(e) => {
                self.log.append(format!("❌ Error running AI script: {}", e));
                None
            }
        };

        self.state.update(|s| s.set_ai_loading(false));
        scheduled
    }

    pub async fn reload_data(&self) {
        self.log.append("🔄 Reloading AI data...");
        match self.client.reload_ai_data().await {
            Ok(_) => {
                self.log.append("✅ AI data reloaded successfully");
                self.refresh().await;
            }
            Err(e) => {
                self.log.append(format!("❌ Error reloading data: {}", e));
            }
        }
    }
}
