//! Cloud sync API.

use std::collections::HashMap;

use crate::client::CogneeClient;
use crate::error::Result;
use crate::gateway::RequestDescriptor;
use crate::types::{SyncRequest, SyncResponse, SyncStatusOverview};

/// Sync API client.
pub struct SyncApi {
    client: CogneeClient,
}

impl SyncApi {
    pub(crate) fn new(client: CogneeClient) -> Self {
        Self { client }
    }

    /// Start syncing datasets. Results are keyed by dataset id.
    pub async fn start(&self, request: &SyncRequest) -> Result<HashMap<String, SyncResponse>> {
        self.client
            .send(RequestDescriptor::post("/sync").json(request)?)
            .await
    }

    /// Overview of running syncs.
    pub async fn status(&self) -> Result<SyncStatusOverview> {
        self.client
            .send(RequestDescriptor::get("/sync/status").accept_json())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::mock_client;
    use crate::transport::HttpResponse;
    use reqwest::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_status() {
        let (client, mock) = mock_client(vec![HttpResponse::json(
            StatusCode::OK,
            &json!({"has_running_sync": true, "running_sync_count": 2}),
        )]);

        let status = client.sync().status().await.unwrap();
        assert!(status.has_running_sync);
        assert_eq!(status.running_sync_count, 2);
        assert_eq!(mock.last_request().unwrap().url.path(), "/api/v1/sync/status");
    }

    #[tokio::test]
    async fn test_start_keyed_by_dataset() {
        let (client, _mock) = mock_client(vec![HttpResponse::json(
            StatusCode::OK,
            &json!({"ds-1": {"run_id": "r1", "status": "started", "dataset_ids": ["ds-1"]}}),
        )]);

        let runs = client.sync().start(&SyncRequest::default()).await.unwrap();
        assert_eq!(runs["ds-1"].run_id.as_deref(), Some("r1"));
    }
}
