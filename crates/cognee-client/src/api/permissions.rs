//! Permissions API: roles, tenants and dataset grants.

use crate::client::CogneeClient;
use crate::error::Result;
use crate::gateway::RequestDescriptor;
use crate::types::Role;

/// Permissions API client.
pub struct PermissionsApi {
    client: CogneeClient,
}

impl PermissionsApi {
    pub(crate) fn new(client: CogneeClient) -> Self {
        Self { client }
    }

    /// Grant a permission (`read`, `write`, `delete`, `share`) on datasets
    /// to a user, role or tenant.
    pub async fn grant_dataset_permissions(
        &self,
        principal_id: &str,
        permission_name: &str,
        dataset_ids: &[String],
    ) -> Result<()> {
        self.client
            .send_empty(
                RequestDescriptor::post(format!("/permissions/datasets/{}", principal_id))
                    .query("permission_name", permission_name)
                    .json(dataset_ids)?,
            )
            .await
    }

    /// Create a role.
    pub async fn create_role(&self, role_name: &str) -> Result<()> {
        self.client
            .send_empty(RequestDescriptor::post("/permissions/roles").query("role_name", role_name))
            .await
    }

    /// Look up a role by name.
    pub async fn role_by_name(&self, role_name: &str) -> Result<Role> {
        self.client
            .send(
                RequestDescriptor::get(format!(
                    "/permissions/roles/{}",
                    urlencoding::encode(role_name)
                ))
                .accept_json(),
            )
            .await
    }

    /// Add a user to a role.
    pub async fn add_user_to_role(&self, user_id: &str, role_id: &str) -> Result<()> {
        self.client
            .send_empty(
                RequestDescriptor::post(format!("/permissions/users/{}/roles", user_id))
                    .query("role_id", role_id),
            )
            .await
    }

    /// Add a user to a tenant.
    pub async fn add_user_to_tenant(&self, user_id: &str, tenant_id: &str) -> Result<()> {
        self.client
            .send_empty(
                RequestDescriptor::post(format!("/permissions/users/{}/tenants", user_id))
                    .query("tenant_id", tenant_id),
            )
            .await
    }

    /// Create a tenant.
    pub async fn create_tenant(&self, tenant_name: &str) -> Result<()> {
        self.client
            .send_empty(
                RequestDescriptor::post("/permissions/tenants").query("tenant_name", tenant_name),
            )
            .await
    }
}
