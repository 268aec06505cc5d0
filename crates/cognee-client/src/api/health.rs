//! Health API.

use crate::client::CogneeClient;
use crate::error::Result;
use crate::gateway::RequestDescriptor;
use crate::types::{DetailedHealthResponse, HealthResponse};

/// Health API client.
///
/// Note: these endpoints live at the server root, not under `/api/v1`,
/// except for the connection check.
pub struct HealthApi {
    client: CogneeClient,
}

impl HealthApi {
    pub(crate) fn new(client: CogneeClient) -> Self {
        Self { client }
    }

    /// Root endpoint greeting.
    pub async fn root(&self) -> Result<serde_json::Value> {
        self.client
            .send(RequestDescriptor::get("/").root().accept_json())
            .await
    }

    /// Check basic health.
    pub async fn check(&self) -> Result<HealthResponse> {
        self.client
            .send(RequestDescriptor::get("/health").root().accept_json())
            .await
    }

    /// Health of each backing component.
    pub async fn detailed(&self) -> Result<DetailedHealthResponse> {
        self.client
            .send(RequestDescriptor::get("/health/detailed").root().accept_json())
            .await
    }

    /// Simple connectivity check - returns true if server is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.check().await.is_ok()
    }

    /// Ask the server to verify its own connection to its providers.
    pub async fn check_connection(&self) -> Result<serde_json::Value> {
        self.client
            .send(RequestDescriptor::post("/checks/connection"))
            .await
    }
}
