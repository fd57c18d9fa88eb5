//! HTTP request and response types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Overall outcome of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum UploadStatus {
    Success,
    Error,
}

/// Response of `POST /upload/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct UploadResponse {
    pub status: UploadStatus,
    /// Number of plots in the new result; 0 on error
    pub num_plots: usize,
    /// Failure detail, only present on error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub message: Option<String>,
}

impl UploadResponse {
    pub fn success(num_plots: usize) -> Self {
        Self {
            status: UploadStatus::Success,
            num_plots,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: UploadStatus::Error,
            num_plots: 0,
            message: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
