//! Display transform for per-detection metadata.

use serde_json::{Map, Value};

/// Backend-only field carrying the crop's filesystem path.
pub const INTERNAL_PATH_KEY: &str = "Crop Path";

/// What a detection card shows in its overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionView {
    /// Not fetched yet.
    Loading,
    /// Formatted `(KEY, value)` rows in server order.
    Fields(Vec<(String, String)>),
    /// The backend had no record for this image.
    NoData,
    /// The fetch failed; the card may retry on the next interaction.
    Error,
}

impl DetectionView {
    pub fn is_error(&self) -> bool {
        matches!(self, DetectionView::Error)
    }

    /// Plain-text rendering used by the console.
    pub fn render(&self) -> String {
        match self {
            DetectionView::Loading => "Loading detection data...".to_string(),
            DetectionView::NoData => "No detection data available".to_string(),
            DetectionView::Error => "Failed to load detection info".to_string(),
            DetectionView::Fields(rows) => rows
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// `crop_confidence` → `CROP CONFIDENCE`.
pub fn display_key(key: &str) -> String {
    key.replace('_', " ").to_uppercase()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Turn a raw `/get-image-info` mapping into card rows.
///
/// Emptiness is judged on the raw record, before the internal key is dropped.
pub fn render_detection(raw: &Map<String, Value>) -> DetectionView {
    if raw.is_empty() {
        return DetectionView::NoData;
    }
    let rows = raw
        .iter()
        .filter(|(key, _)| key.as_str() != INTERNAL_PATH_KEY)
        .map(|(key, value)| (display_key(key), display_value(value)))
        .collect();
    DetectionView::Fields(rows)
}
