//! Dashboard UI state with one transition per operator or network event.

use crate::params::{FlightParam, FlightParameters};
use crate::upload::{KmlFile, UploadBatch};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pane {
    /// Detection card gallery
    #[default]
    Crops,
    Map,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub theme: Theme,
    pub active_pane: Pane,
    /// Full image URLs for the gallery.
    pub images: Vec<String>,
    pub ai_loading: bool,
    pub mission_loading: bool,
    pub upload_modal_open: bool,
    pub control_modal_open: bool,
    pub selection: UploadBatch,
    pub uploading: bool,
    pub upload_message: String,
    pub flight_params: FlightParameters,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== CHROME ==========

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn show_pane(&mut self, pane: Pane) {
        self.active_pane = pane;
    }

    pub fn open_control_modal(&mut self) {
        self.control_modal_open = true;
    }

    pub fn close_control_modal(&mut self) {
        self.control_modal_open = false;
    }

    // ========== UPLOAD MODAL ==========

    pub fn open_upload_modal(&mut self) {
        self.upload_modal_open = true;
    }

    /// Cancel is disabled while an upload is in flight; returns whether it closed.
    pub fn cancel_upload_modal(&mut self) -> bool {
        if self.uploading {
            return false;
        }
        self.upload_modal_open = false;
        self.selection = UploadBatch::default();
        self.upload_message.clear();
        true
    }

    pub fn select_from_picker(&mut self, files: Vec<KmlFile>) {
        self.set_selection(UploadBatch::from_picker(files));
    }

    pub fn select_from_drop(&mut self, files: Vec<KmlFile>) {
        self.set_selection(UploadBatch::from_drop(files));
    }

    fn set_selection(&mut self, batch: UploadBatch) {
        self.upload_message = batch.selection_message();
        self.selection = batch;
    }

    pub fn can_upload(&self) -> bool {
        !self.uploading && !self.selection.is_empty()
    }

    pub fn set_param(&mut self, field: FlightParam, input: &str) {
        self.flight_params.set(field, input);
    }

    pub fn set_optimize_angle(&mut self, optimize: bool) {
        self.flight_params.set_optimize_angle(optimize);
    }

    pub fn upload_rejected_empty(&mut self) {
        self.upload_message = "Please select KML files to upload.".to_string();
    }

    pub fn upload_started(&mut self) {
        self.uploading = true;
        self.upload_message = "Uploading KML files...".to_string();
    }

    pub fn upload_accepted(&mut self) {
        self.upload_message = "KML files uploaded successfully!".to_string();
    }

    /// The upload step failed: the modal stays open with the reason shown.
    pub fn upload_failed(&mut self, reason: &str) {
        self.uploading = false;
        self.upload_message = format!("Upload failed: {}", reason);
    }

    /// The waypoint loop ran to the end, whatever the per-file outcomes.
    pub fn upload_finished(&mut self) {
        self.uploading = false;
        self.upload_modal_open = false;
        self.selection = UploadBatch::default();
    }

    // ========== BACKGROUND OPERATIONS ==========

    pub fn set_images(&mut self, images: Vec<String>) {
        self.images = images;
    }

    pub fn set_ai_loading(&mut self, loading: bool) {
        self.ai_loading = loading;
    }

    pub fn set_mission_loading(&mut self, loading: bool) {
        self.mission_loading = loading;
    }
}
