use serde::{Deserialize, Serialize};

use crate::models::domain::PostId;

/// Response for the availability filter endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResponse {
    pub matches: Vec<PostId>,
    pub total_candidates: usize,
    pub checked: usize,
    pub engine_errors: usize,
    pub truncated: bool,
    pub selection_label: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub products: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
