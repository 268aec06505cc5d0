//! OpenAI-compatible responses API.

use crate::client::CogneeClient;
use crate::error::Result;
use crate::gateway::RequestDescriptor;
use crate::types::{ResponseBody, ResponseRequest};

/// Responses API client.
pub struct ResponsesApi {
    client: CogneeClient,
}

impl ResponsesApi {
    pub(crate) fn new(client: CogneeClient) -> Self {
        Self { client }
    }

    /// Create a response.
    pub async fn create(&self, request: &ResponseRequest) -> Result<ResponseBody> {
        // Trailing slash is part of the route; the server redirects without it.
        self.client
            .send(RequestDescriptor::post("/responses/").json(request)?)
            .await
    }
}
