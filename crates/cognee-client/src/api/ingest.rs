//! Ingestion API.

use crate::client::CogneeClient;
use crate::error::Result;
use crate::gateway::RequestDescriptor;
use crate::transport::{FormPart, UploadFile};
use crate::types::{AddDataRequest, PipelineRunInfo};

/// Ingestion API client.
pub struct IngestApi {
    client: CogneeClient,
}

impl IngestApi {
    pub(crate) fn new(client: CogneeClient) -> Self {
        Self { client }
    }

    /// Upload files into a dataset.
    pub async fn add(
        &self,
        files: Vec<UploadFile>,
        request: AddDataRequest,
    ) -> Result<PipelineRunInfo> {
        self.client
            .send(RequestDescriptor::post("/add").multipart(add_form(files, request)))
            .await
    }

    /// Upload a single text document into a named dataset.
    pub async fn add_text(
        &self,
        file_name: impl Into<String>,
        text: impl Into<String>,
        dataset_name: impl Into<String>,
    ) -> Result<PipelineRunInfo> {
        let text: String = text.into();
        let file = UploadFile::new(file_name, text).with_mime_type("text/plain");
        self.add(vec![file], AddDataRequest::to_dataset(dataset_name))
            .await
    }
}

fn add_form(files: Vec<UploadFile>, request: AddDataRequest) -> Vec<FormPart> {
    let mut parts: Vec<FormPart> = files
        .into_iter()
        .map(|file| FormPart::file("data", file))
        .collect();

    if let Some(name) = request.dataset_name.filter(|n| !n.is_empty()) {
        parts.push(FormPart::text("datasetName", name));
    }
    if let Some(id) = request.dataset_id.filter(|id| !id.is_empty()) {
        parts.push(FormPart::text("datasetId", id));
    }
    parts.extend(
        request
            .node_set
            .into_iter()
            .map(|node| FormPart::text("node_set", node)),
    );

    parts
}
