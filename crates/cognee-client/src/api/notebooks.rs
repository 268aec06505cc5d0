//! Notebooks API.
//!
//! Notebook responses are returned as raw JSON; their shape is owned by the
//! server's UI and changes between releases.

use crate::client::CogneeClient;
use crate::error::Result;
use crate::gateway::RequestDescriptor;
use crate::types::{NotebookData, RunCodeData};

/// Notebooks API client.
pub struct NotebooksApi {
    client: CogneeClient,
}

impl NotebooksApi {
    pub(crate) fn new(client: CogneeClient) -> Self {
        Self { client }
    }

    /// List notebooks.
    pub async fn list(&self) -> Result<serde_json::Value> {
        self.client
            .send(RequestDescriptor::get("/notebooks").accept_json())
            .await
    }

    /// Create a notebook.
    pub async fn create(&self, data: &NotebookData) -> Result<serde_json::Value> {
        self.client
            .send(RequestDescriptor::post("/notebooks").json(data)?)
            .await
    }

    /// Replace a notebook's name and cells.
    pub async fn update(
        &self,
        notebook_id: &str,
        data: &NotebookData,
    ) -> Result<serde_json::Value> {
        self.client
            .send(RequestDescriptor::put(format!("/notebooks/{}", notebook_id)).json(data)?)
            .await
    }

    /// Delete a notebook.
    pub async fn delete(&self, notebook_id: &str) -> Result<serde_json::Value> {
        self.client
            .send(RequestDescriptor::delete(format!("/notebooks/{}", notebook_id)))
            .await
    }

    /// Execute a cell.
    pub async fn run_cell(
        &self,
        notebook_id: &str,
        cell_id: &str,
        code: impl Into<String>,
    ) -> Result<serde_json::Value> {
        let data = RunCodeData {
            content: code.into(),
        };
        self.client
            .send(
                RequestDescriptor::post(format!("/notebooks/{}/{}/run", notebook_id, cell_id))
                    .json(&data)?,
            )
            .await
    }
}
