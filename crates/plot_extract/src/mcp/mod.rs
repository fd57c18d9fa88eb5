use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rmcp::{
    handler::server::tool::IntoCallToolResult, model::{CallToolResult, Content, ServerCapabilities, ServerInfo}, schemars, tool, Error as McpError, ServerHandler
};
use serde::Deserialize;

use crate::{
    error::PlotError,
    server::UploadResponse,
    session::ExtractionSession,
    types::PlotBoundaryRecord,
};

/// Request for running extraction on a layout sheet
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UploadLayoutRequest {
    #[schemars(description = "Path to the layout image file")]
    pub path: Option<String>,
    #[schemars(description = "Base64 encoded image bytes, used when no path is given")]
    pub image_base64: Option<String>,
}

/// Request for looking up one plot by label
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlotLookupRequest {
    #[schemars(description = "Plot label, e.g. Plot_3")]
    pub plot_number: String,
}

impl UploadLayoutRequest {
    fn image_bytes(&self) -> crate::Result<Vec<u8>> {
        match (&self.path, &self.image_base64) {
            (Some(path), _) => Ok(std::fs::read(path)?),
            (None, Some(data)) => STANDARD
                .decode(data.trim())
                .map_err(|e| PlotError::InvalidRequest(format!("Invalid base64 image data: {}", e))),
            (None, None) => Err(PlotError::InvalidRequest(
                "Either 'path' or 'image_base64' is required".to_string(),
            )),
        }
    }
}

impl IntoCallToolResult for UploadResponse {
    fn into_call_tool_result(self) -> std::result::Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&self).unwrap_or_else(|_| format!("{:?}", self)),
        )]))
    }
}

/// MCP server exposing the extraction session to agent clients
#[derive(Clone)]
pub struct PlotMcpServer {
    session: Arc<ExtractionSession>,
}

impl PlotMcpServer {
    pub fn new() -> Self {
        Self::with_session(Arc::new(ExtractionSession::new()))
    }

    /// Share an existing session, e.g. with the HTTP surface
    pub fn with_session(session: Arc<ExtractionSession>) -> Self {
        Self { session }
    }
}

impl Default for PlotMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool(tool_box)]
impl PlotMcpServer {
    #[tool(description = "Extract plot boundaries from a layout sheet and make them the current result")]
    async fn upload_layout(&self, #[tool(aggr)] request: UploadLayoutRequest) -> UploadResponse {
        let bytes = match request.image_bytes() {
            Ok(bytes) => bytes,
            Err(e) => return UploadResponse::error(e.to_string()),
        };

        // Extraction and OCR are CPU bound; keep them off the stdio workers
        let session = Arc::clone(&self.session);
        match tokio::task::spawn_blocking(move || session.run(&bytes)).await {
            Ok(Ok(result)) => UploadResponse::success(result.len()),
            Ok(Err(e)) => UploadResponse::error(format!("Plot extraction failed: {}", e)),
            Err(e) => {
                tracing::error!("Extraction task panicked: {}", e);
                UploadResponse::error("Extraction task failed")
            }
        }
    }

    #[tool(description = "List the plots of the most recent successful extraction")]
    fn get_plots(&self) -> String {
        serde_json::to_string_pretty(&self.session.records())
            .unwrap_or_else(|e| format!("Failed to serialize plots: {}", e))
    }

    #[tool(description = "Get the most recent extraction as a GeoJSON FeatureCollection")]
    fn get_plots_geojson(&self) -> String {
        let result = self.session.current().unwrap_or_default();
        result.to_geojson_string()
            .unwrap_or_else(|e| format!("Failed to serialize GeoJSON: {}", e))
    }

    #[tool(description = "Get one plot of the current result as a GeoJSON feature, with area, perimeter and vertex count")]
    fn get_plot(&self, #[tool(aggr)] PlotLookupRequest { plot_number }: PlotLookupRequest) -> String {
        let geojson = self.session.current().unwrap_or_default().to_typed_geojson();
        match geojson.find_plot(&plot_number) {
            Some(feature) => serde_json::to_string_pretty(feature)
                .unwrap_or_else(|e| format!("Failed to serialize plot: {}", e)),
            None => format!("No plot labelled '{}' in the current result", plot_number),
        }
    }

    #[tool(description = "List the labels of plots whose printed text could not be read")]
    fn get_unlabelled_plots(&self) -> String {
        let geojson = self.session.current().unwrap_or_default().to_typed_geojson();
        let labels: Vec<String> = geojson
            .unlabelled_plots()
            .into_iter()
            .filter_map(|feature| feature.properties())
            .map(|props| props.plot_number)
            .collect();
        serde_json::to_string_pretty(&labels)
            .unwrap_or_else(|e| format!("Failed to serialize labels: {}", e))
    }

    #[tool(description = "Get the JSON schema of a plot record")]
    fn get_record_schema(&self) -> String {
        let schema = schemars::schema_for!(PlotBoundaryRecord);
        serde_json::to_string_pretty(&schema)
            .unwrap_or_else(|e| format!("Failed to serialize schema: {}", e))
    }
}

#[tool(tool_box)]
impl ServerHandler for PlotMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Plot Boundary Extraction Server - Detect plot outlines and their printed labels on scanned layout sheets. Call upload_layout first, then get_plots.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
