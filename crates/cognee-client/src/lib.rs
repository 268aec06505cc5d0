//! HTTP client SDK for the Cognee knowledge-graph memory server.
//!
//! Every call goes through a single request gateway that resolves the URL,
//! attaches credentials, encodes the body, and turns non-2xx responses into a
//! [`GatewayError`]. Endpoint handles on [`CogneeClient`] are thin wrappers
//! that describe a request and name the response type.
//!
//! # Example
//!
//! ```no_run
//! use cognee_client::{CogneeClient, Result, SearchRequest, SearchType};
//!
//! # async fn example() -> Result<()> {
//! let client = CogneeClient::builder()
//!     .base_url("http://localhost:8000")
//!     .api_key("ck_live_123")
//!     .build()?;
//!
//! if client.health().is_healthy().await {
//!     println!("Server is healthy!");
//! }
//!
//! // Ingest some text and build the graph
//! client
//!     .ingest()
//!     .add_text("notes.txt", "Alice met Bob in Paris.", "people")
//!     .await?;
//! client.cognify().run(&Default::default()).await?;
//!
//! let results = client
//!     .search()
//!     .query(
//!         &SearchRequest::new("Who did Alice meet?")
//!             .with_type(SearchType::GraphCompletion)
//!             .in_datasets(vec!["people".to_string()]),
//!     )
//!     .await?;
//! println!("{results:?}");
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Auth / Users**: Login, logout, registration, password flows, profile
//! - **Ingest**: Multipart upload of files and text
//! - **Cognify**: Graph construction, memify, code graph
//! - **Datasets**: CRUD, graph, status, raw downloads
//! - **Search**: Typed search and history
//! - **Settings / Sync / Permissions / Notebooks / Responses**
//! - **Health**: Root-scoped liveness checks

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod transport;
pub mod types;

pub use client::{ClientBuilder, CogneeClient};
pub use config::ClientConfig;
pub use error::{Error, ErrorPayload, GatewayError, Result};
pub use gateway::{ApiScope, DecodedResponse, RequestDescriptor};
pub use transport::{
    FormPart, HttpRequest, HttpResponse, MockTransport, PartValue, ReqwestTransport, RequestBody,
    Transport, TransportError, UploadFile,
};
pub use types::*;
