//! Search API.

use crate::client::CogneeClient;
use crate::error::Result;
use crate::gateway::RequestDescriptor;
use crate::types::{SearchHistoryItem, SearchRequest, SearchResult};

/// Search API client.
pub struct SearchApi {
    client: CogneeClient,
}

impl SearchApi {
    pub(crate) fn new(client: CogneeClient) -> Self {
        Self { client }
    }

    /// Run a search.
    pub async fn query(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        self.client
            .send(RequestDescriptor::post("/search").json(request)?)
            .await
    }

    /// Search with the server's default search type.
    pub async fn text(&self, query: impl Into<String>) -> Result<Vec<SearchResult>> {
        self.query(&SearchRequest::new(query)).await
    }

    /// Past searches by the caller.
    pub async fn history(&self) -> Result<Vec<SearchHistoryItem>> {
        self.client
            .send(RequestDescriptor::get("/search").accept_json())
            .await
    }
}
