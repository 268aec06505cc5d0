//! Datasets API.

use bytes::Bytes;

use crate::client::CogneeClient;
use crate::error::Result;
use crate::gateway::RequestDescriptor;
use crate::types::{
    CreateDatasetRequest, DataItem, Dataset, DatasetStatusResponse, DeleteMode, Graph,
};

/// Datasets API client.
pub struct DatasetsApi {
    client: CogneeClient,
}

impl DatasetsApi {
    pub(crate) fn new(client: CogneeClient) -> Self {
        Self { client }
    }

    /// List datasets visible to the caller.
    pub async fn list(&self) -> Result<Vec<Dataset>> {
        self.client
            .send(RequestDescriptor::get("/datasets").accept_json())
            .await
    }

    /// Create a dataset (or return the existing one with that name).
    pub async fn create(&self, name: impl Into<String>) -> Result<Dataset> {
        let request = CreateDatasetRequest { name: name.into() };
        self.client
            .send(RequestDescriptor::post("/datasets").json(&request)?)
            .await
    }

    /// Delete a dataset.
    pub async fn delete(&self, dataset_id: &str) -> Result<()> {
        self.client
            .send_empty(RequestDescriptor::delete(format!("/datasets/{}", dataset_id)))
            .await
    }

    /// Get the knowledge graph of a dataset.
    pub async fn graph(&self, dataset_id: &str) -> Result<Graph> {
        self.client
            .send(RequestDescriptor::get(format!("/datasets/{}/graph", dataset_id)).accept_json())
            .await
    }

    /// List the data items of a dataset.
    pub async fn data(&self, dataset_id: &str) -> Result<Vec<DataItem>> {
        self.client
            .send(RequestDescriptor::get(format!("/datasets/{}/data", dataset_id)).accept_json())
            .await
    }

    /// Processing status of datasets, keyed by dataset id.
    pub async fn status<I, S>(&self, dataset_ids: I) -> Result<DatasetStatusResponse>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.client
            .send(
                RequestDescriptor::get("/datasets/status")
                    .query_all("dataset", dataset_ids)
                    .accept_json(),
            )
            .await
    }

    /// Remove one data item from a dataset.
    pub async fn delete_data_item(&self, dataset_id: &str, data_id: &str) -> Result<()> {
        self.client
            .send_empty(RequestDescriptor::delete(format!(
                "/datasets/{}/data/{}",
                dataset_id, data_id
            )))
            .await
    }

    /// Download the original file of a data item.
    pub async fn raw_data(&self, dataset_id: &str, data_id: &str) -> Result<Bytes> {
        self.client
            .dispatch_binary(RequestDescriptor::get(format!(
                "/datasets/{}/data/{}/raw",
                dataset_id, data_id
            )))
            .await
    }

    /// Delete a data item and, in hard mode, everything derived from it.
    pub async fn delete_data(
        &self,
        dataset_id: &str,
        data_id: &str,
        mode: DeleteMode,
    ) -> Result<()> {
        self.client
            .send_empty(
                RequestDescriptor::delete("/delete")
                    .query("dataset_id", dataset_id)
                    .query("data_id", data_id)
                    .query("mode", mode.as_str()),
            )
            .await
    }

    /// Render the dataset graph as an HTML page.
    pub async fn visualize(&self, dataset_id: &str) -> Result<String> {
        self.client
            .send(
                RequestDescriptor::get("/visualize")
                    .query("dataset_id", dataset_id)
                    .accept_json(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::mock_client;
    use crate::transport::HttpResponse;
    use reqwest::header::{CONTENT_TYPE, HeaderValue};
    use reqwest::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_status_repeats_dataset_key() {
        let (client, mock) = mock_client(vec![HttpResponse::json(
            StatusCode::OK,
            &json!({"d1": "DATASET_PROCESSING_COMPLETED", "d2": "DATASET_PROCESSING_STARTED"}),
        )]);

        let status = client.datasets().status(["d1", "d2"]).await.unwrap();
        assert_eq!(status["d1"], "DATASET_PROCESSING_COMPLETED");

        let request = mock.last_request().unwrap();
        assert_eq!(
            request.url.as_str(),
            "https://api.example.com/api/v1/datasets/status?dataset=d1&dataset=d2"
        );
    }

    #[tokio::test]
    async fn test_not_found_message() {
        let (client, _mock) = mock_client(vec![HttpResponse::json(
            StatusCode::NOT_FOUND,
            &json!({"message": "Dataset not found"}),
        )]);

        let err = client.datasets().graph("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.as_gateway().unwrap().message, "Dataset not found");
    }

    #[tokio::test]
    async fn test_delete_data_query() {
        let (client, mock) = mock_client(vec![HttpResponse::new(StatusCode::OK, "")]);

        client
            .datasets()
            .delete_data("ds-1", "data-1", DeleteMode::Hard)
            .await
            .unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(
            request.url.as_str(),
            "https://api.example.com/api/v1/delete?dataset_id=ds-1&data_id=data-1&mode=hard"
        );
    }

    #[tokio::test]
    async fn test_raw_data_returns_bytes() {
        let (client, mock) = mock_client(vec![
            HttpResponse::new(StatusCode::OK, vec![0u8, 159, 146, 150]).with_header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
        ]);

        let bytes = client.datasets().raw_data("ds-1", "data-1").await.unwrap();
        assert_eq!(&bytes[..], &[0u8, 159, 146, 150]);
        assert_eq!(
            mock.last_request().unwrap().url.path(),
            "/api/v1/datasets/ds-1/data/data-1/raw"
        );
    }

    #[tokio::test]
    async fn test_visualize_returns_html_text() {
        let (client, _mock) = mock_client(vec![
            HttpResponse::new(StatusCode::OK, "<html>graph</html>").with_header(
                CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            ),
        ]);

        let html = client.datasets().visualize("ds-1").await.unwrap();
        assert_eq!(html, "<html>graph</html>");
    }

    #[tokio::test]
    async fn test_list_decodes_datasets() {
        let (client, _mock) = mock_client(vec![HttpResponse::json(
            StatusCode::OK,
            &json!([{
                "id": "ds-1",
                "name": "docs",
                "created_at": "2025-01-01T00:00:00Z",
                "updated_at": null,
                "owner_id": "u1"
            }]),
        )]);

        let datasets = client.datasets().list().await.unwrap();
        assert_eq!(datasets.len(), 1);
        assert_eq!(datasets[0].name, "docs");
        assert!(datasets[0].updated_at.is_none());
    }
}
