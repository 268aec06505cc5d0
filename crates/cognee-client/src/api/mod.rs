//! API endpoint implementations.

mod auth;
mod cognify;
mod datasets;
mod health;
mod ingest;
mod notebooks;
mod permissions;
mod responses;
mod search;
mod settings;
mod sync;
mod users;

pub use auth::AuthApi;
pub use cognify::CognifyApi;
pub use datasets::DatasetsApi;
pub use health::HealthApi;
pub use ingest::IngestApi;
pub use notebooks::NotebooksApi;
pub use permissions::PermissionsApi;
pub use responses::ResponsesApi;
pub use search::SearchApi;
pub use settings::SettingsApi;
pub use sync::SyncApi;
pub use users::UsersApi;
