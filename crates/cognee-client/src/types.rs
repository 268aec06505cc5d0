//! Request and response types for the Cognee API.
//!
//! Field names are snake_case on both sides of the wire, matching the
//! server's JSON. Ids are kept as strings (the server uses UUIDs but never
//! requires the client to interpret them).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Enums
// ─────────────────────────────────────────────────────────────────────────────

/// Retrieval strategy for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchType {
    Summaries,
    Insights,
    Chunks,
    RagCompletion,
    GraphCompletion,
    GraphSummaryCompletion,
    Code,
    Cypher,
    NaturalLanguage,
    GraphCompletionCot,
    GraphCompletionContextExtension,
    FeelingLucky,
    Feedback,
    Temporal,
    CodingRules,
}

/// State of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStatus {
    #[serde(rename = "PipelineRunStarted")]
    Started,
    #[serde(rename = "PipelineRunYield")]
    Yield,
    #[serde(rename = "PipelineRunCompleted")]
    Completed,
    #[serde(rename = "PipelineRunAlreadyCompleted")]
    AlreadyCompleted,
    #[serde(rename = "PipelineRunErrored")]
    Errored,
}

impl PipelineStatus {
    /// Parse the server's status string.
    pub fn parse(s: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(s.to_string())).ok()
    }

    /// Check if the run has stopped, successfully or not.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            PipelineStatus::Completed | PipelineStatus::AlreadyCompleted | PipelineStatus::Errored
        )
    }
}

/// How a data item is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Remove from the dataset, keep graph artifacts.
    #[default]
    Soft,
    /// Remove everything derived from the item.
    Hard,
}

impl DeleteMode {
    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteMode::Soft => "soft",
            DeleteMode::Hard => "hard",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth & Users
// ─────────────────────────────────────────────────────────────────────────────

/// Credentials for password login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// Create a login request.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// New account registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

impl RegisterRequest {
    /// Register with just an email and password.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            is_active: None,
            is_superuser: None,
            is_verified: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestVerifyTokenRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// Partial update of a user account. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Datasets
// ─────────────────────────────────────────────────────────────────────────────

/// A dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub owner_id: String,
}

/// Request to create a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDatasetRequest {
    pub name: String,
}

/// A data item stored in a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataItem {
    pub id: String,
    pub name: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub extension: String,
    pub mime_type: String,
    pub raw_data_location: String,
    pub dataset_id: String,
}

/// Processing status keyed by dataset id.
pub type DatasetStatusResponse = HashMap<String, String>;

/// Knowledge graph of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub label: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Ingestion & Processing
// ─────────────────────────────────────────────────────────────────────────────

/// Options for adding files.
///
/// Sent as multipart fields `datasetName`, `datasetId` and repeated
/// `node_set` alongside the files.
#[derive(Debug, Clone, Default)]
pub struct AddDataRequest {
    pub dataset_name: Option<String>,
    pub dataset_id: Option<String>,
    pub node_set: Vec<String>,
}

impl AddDataRequest {
    /// Add into a dataset by name.
    pub fn to_dataset(name: impl Into<String>) -> Self {
        Self {
            dataset_name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Result of a pipeline run for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRunInfo {
    pub status: String,
    pub pipeline_run_id: String,
    pub dataset_id: String,
    pub dataset_name: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub data_ingestion_info: Vec<serde_json::Value>,
}

impl PipelineRunInfo {
    /// Typed status, if the server sent a known value.
    pub fn pipeline_status(&self) -> Option<PipelineStatus> {
        PipelineStatus::parse(&self.status)
    }
}

/// Request to build the knowledge graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CognifyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_in_background: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
}

/// Pipeline runs keyed by dataset id.
pub type CognifyResponse = HashMap<String, PipelineRunInfo>;

/// Request to enrich an existing graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemifyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_tasks: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment_tasks: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_in_background: Option<bool>,
}

/// Request to index a code repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeIndexRequest {
    pub repo_path: String,
    pub include_docs: bool,
}

/// Request to retrieve code context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRetrieveRequest {
    pub query: String,
    pub full_input: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────────────────

/// Search query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_type: Option<SearchType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_context: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_combined_context: Option<bool>,
}

impl SearchRequest {
    /// Search with just a query string.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set the search type.
    pub fn with_type(mut self, search_type: SearchType) -> Self {
        self.search_type = Some(search_type);
        self
    }

    /// Restrict to named datasets.
    pub fn in_datasets(mut self, datasets: Vec<String>) -> Self {
        self.datasets = Some(datasets);
        self
    }

    /// Limit the number of results.
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }
}

/// A single search result. The shape depends on the search type.
pub type SearchResult = serde_json::Value;

/// A past search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryItem {
    pub id: String,
    pub text: String,
    pub user: String,
    pub created_at: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Current server settings. Provider sections are passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub llm: serde_json::Value,
    #[serde(default)]
    pub vector_db: serde_json::Value,
}

/// Settings update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_db: Option<VectorDbSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorDbSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Sync
// ─────────────────────────────────────────────────────────────────────────────

/// Request to sync datasets to the cloud. An empty list syncs everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dataset_ids: Vec<String>,
}

/// A started sync run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub dataset_ids: Vec<String>,
    #[serde(default)]
    pub dataset_names: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Summary of running syncs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncStatusOverview {
    #[serde(default)]
    pub has_running_sync: bool,
    #[serde(default)]
    pub running_sync_count: u32,
    #[serde(default)]
    pub latest_running_sync: Option<serde_json::Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Permissions
// ─────────────────────────────────────────────────────────────────────────────

/// A role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Notebooks
// ─────────────────────────────────────────────────────────────────────────────

/// Notebook contents for create/update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotebookData {
    pub name: String,
    #[serde(default)]
    pub cells: Vec<NotebookCell>,
}

/// A notebook cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotebookCell {
    pub id: String,
    /// `"markdown"` or `"code"`.
    #[serde(rename = "type")]
    pub cell_type: String,
    pub name: String,
    pub content: String,
}

/// Code to execute in a cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunCodeData {
    pub content: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses (OpenAI-compatible)
// ─────────────────────────────────────────────────────────────────────────────

/// OpenAI-style response request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseRequest {
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
}

/// OpenAI-style response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub id: String,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<serde_json::Value>,
    #[serde(default)]
    pub usage: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Health
// ─────────────────────────────────────────────────────────────────────────────

/// Basic health check response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub health: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Detailed health check response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uptime: Option<f64>,
    #[serde(default)]
    pub components: HashMap<String, ComponentHealth>,
}

/// Health of one backing component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentHealth {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub response_time_ms: Option<f64>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
