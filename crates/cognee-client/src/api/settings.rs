//! Settings API.

use crate::client::CogneeClient;
use crate::error::Result;
use crate::gateway::RequestDescriptor;
use crate::types::{Settings, SettingsRequest};

/// Settings API client.
pub struct SettingsApi {
    client: CogneeClient,
}

impl SettingsApi {
    pub(crate) fn new(client: CogneeClient) -> Self {
        Self { client }
    }

    /// Get the current LLM and vector store settings.
    pub async fn get(&self) -> Result<Settings> {
        self.client
            .send(RequestDescriptor::get("/settings").accept_json())
            .await
    }

    /// Save settings.
    pub async fn save(&self, request: &SettingsRequest) -> Result<()> {
        self.client
            .send_empty(RequestDescriptor::post("/settings").json(request)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::mock_client;
    use crate::transport::{HttpResponse, RequestBody};
    use crate::types::LlmSettings;
    use reqwest::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_skips_unset_sections() {
        let (client, mock) = mock_client(vec![HttpResponse::new(StatusCode::OK, "null")]);

        let request = SettingsRequest {
            llm: Some(LlmSettings {
                provider: Some("openai".to_string()),
                model: Some("gpt-4o-mini".to_string()),
                api_key: None,
            }),
            vector_db: None,
        };
        client.settings().save(&request).await.unwrap();

        assert_eq!(
            mock.last_request().unwrap().body,
            RequestBody::Json(json!({"llm": {"provider": "openai", "model": "gpt-4o-mini"}}))
        );
    }

    #[tokio::test]
    async fn test_get_passes_sections_through() {
        let (client, _mock) = mock_client(vec![HttpResponse::json(
            StatusCode::OK,
            &json!({
                "llm": {"provider": {"value": "openai"}},
                "vector_db": {"provider": {"value": "lancedb"}}
            }),
        )]);

        let settings = client.settings().get().await.unwrap();
        assert_eq!(settings.llm["provider"]["value"], "openai");
        assert_eq!(settings.vector_db["provider"]["value"], "lancedb");
    }
}
