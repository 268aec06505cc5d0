//! Cognify, memify and code pipeline API.

use crate::client::CogneeClient;
use crate::error::Result;
use crate::gateway::RequestDescriptor;
use crate::types::{
    CodeIndexRequest, CodeRetrieveRequest, CognifyRequest, CognifyResponse, MemifyRequest,
};

/// Graph-building pipelines.
pub struct CognifyApi {
    client: CogneeClient,
}

impl CognifyApi {
    pub(crate) fn new(client: CogneeClient) -> Self {
        Self { client }
    }

    /// Build the knowledge graph for datasets.
    pub async fn run(&self, request: &CognifyRequest) -> Result<CognifyResponse> {
        self.client
            .send(RequestDescriptor::post("/cognify").json(request)?)
            .await
    }

    /// Cognify named datasets in the background.
    pub async fn run_in_background(&self, datasets: Vec<String>) -> Result<CognifyResponse> {
        self.run(&CognifyRequest {
            datasets: Some(datasets),
            run_in_background: Some(true),
            ..Default::default()
        })
        .await
    }

    /// Enrich an existing graph.
    pub async fn memify(&self, request: &MemifyRequest) -> Result<serde_json::Value> {
        self.client
            .send(RequestDescriptor::post("/memify").json(request)?)
            .await
    }

    /// Index a code repository.
    pub async fn code_index(&self, request: &CodeIndexRequest) -> Result<()> {
        self.client
            .send_empty(RequestDescriptor::post("/code-pipeline/index").json(request)?)
            .await
    }

    /// Retrieve code context for a query.
    pub async fn code_retrieve(
        &self,
        request: &CodeRetrieveRequest,
    ) -> Result<Vec<serde_json::Map<String, serde_json::Value>>> {
        self.client
            .send(RequestDescriptor::post("/code-pipeline/retrieve").json(request)?)
            .await
    }
}
