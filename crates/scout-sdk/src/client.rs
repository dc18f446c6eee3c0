//! HTTP client for the Scout control API.

use anyhow::{anyhow, Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use scout_core::{
    CommandRequest, CommandResponse, DroneCommand, FlightParameters, ImageListResponse,
    ScriptResponse, UploadBatch, UploadResult, WaypointRequest, WaypointResponse,
};
use serde_json::{Map, Value};

/// Multipart field the upload endpoint reads, once per file.
pub const KML_FORM_FIELD: &str = "kmlFiles";

const KML_MIME: &str = "application/vnd.google-earth.kml+xml";

/// Client for the ground-control backend.
///
/// Built without a request timeout: operations run until the backend
/// answers or the transport fails.
#[derive(Debug, Clone)]
pub struct GroundControlClient {
    pub(crate) base_url: String,
    pub(crate) client: reqwest::Client,
}

impl GroundControlClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Address the embedded map surface is loaded from.
    pub fn map_url(&self) -> String {
        format!("{}/ai-map", self.base_url)
    }

    /// Card image source for a detection crop.
    pub fn image_url(&self, name: &str) -> String {
        format!("{}/ai-images/{}", self.base_url, name)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ========== DETECTIONS ==========

    /// List detection crop names.
    pub async fn list_ai_images(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["ai-images"])?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("GET /ai-images returned {}", response.status());
        }
        let body: ImageListResponse = response.json().await?;
        Ok(body.image_urls)
    }

    /// Raw metadata mapping for one detection crop.
    ///
    /// The backend answers a missing record with `{}` under a 404 or 500,
    /// so the body is read whatever the status. Only a body that is not a
    /// JSON object is an error.
    pub async fn get_image_info(&self, name: &str) -> Result<Map<String, Value>> {
        let url = self.endpoint(&["get-image-info", name])?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(image = name, %status, "Detection info returned non-success status");
        }
        let body: Value = response
            .json()
            .await
            .with_context(|| format!("GET /get-image-info/{} returned {}", name, status))?;
        match body {
            Value::Object(map) => Ok(map),
            other => anyhow::bail!(
                "GET /get-image-info/{} returned {} with a non-object body: {}",
                name,
                status,
                other
            ),
        }
    }

    /// Run the AI detection script on the backend.
    pub async fn run_ai_script(&self) -> Result<ScriptResponse> {
        let url = self.endpoint(&["run-ai-script"])?;
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("POST /run-ai-script returned {}", response.status());
        }
        Ok(response.json().await?)
    }

    /// Ask the backend to re-read its detection data.
    pub async fn reload_ai_data(&self) -> Result<ScriptResponse> {
        let url = self.endpoint(&["reload-ai-data"])?;
        let response = self.client.post(url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("POST /reload-ai-data returned {}", response.status());
        }
        Ok(response.json().await?)
    }

    // ========== COMMANDS ==========

    /// Send a flight-control command. All commands share one endpoint.
    pub async fn send_command(&self, command: DroneCommand) -> Result<CommandResponse> {
        let url = self.endpoint(&["send_mission_command"])?;
        let response = self
            .client
            .post(url)
            .json(&CommandRequest { command })
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("POST /send_mission_command returned {}", response.status());
        }
        Ok(response.json().await?)
    }

    // ========== MISSION GEOMETRY ==========

    /// Upload a batch as one multipart request, one `kmlFiles` part per file.
    pub async fn upload_kml(&self, batch: &UploadBatch) -> Result<UploadResult> {
        let url = self.endpoint(&["upload-kml"])?;

        let mut form = Form::new();
        for file in batch.files() {
            let part = Part::bytes(file.contents.clone())
                .file_name(file.name.clone())
                .mime_str(KML_MIME)?;
            form = form.part(KML_FORM_FIELD, part);
        }

        let response = self.client.post(url).multipart(form).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("POST /upload-kml returned {}", response.status());
        }
        Ok(response.json().await?)
    }

    /// Request waypoint generation for one uploaded file.
    pub async fn generate_waypoint(
        &self,
        filename: &str,
        params: &FlightParameters,
    ) -> Result<WaypointResponse> {
        let url = self.endpoint(&["generate_waypoint"])?;
        let response = self
            .client
            .post(url)
            .json(&WaypointRequest::new(filename, params))
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("POST /generate_waypoint returned {}", response.status());
        }
        Ok(response.json().await?)
    }
}
