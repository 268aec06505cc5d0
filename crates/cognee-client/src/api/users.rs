//! Users API.

use crate::client::CogneeClient;
use crate::error::Result;
use crate::gateway::RequestDescriptor;
use crate::types::{User, UserUpdateRequest};

/// Users API client.
pub struct UsersApi {
    client: CogneeClient,
}

impl UsersApi {
    pub(crate) fn new(client: CogneeClient) -> Self {
        Self { client }
    }

    /// Get the authenticated user.
    pub async fn me(&self) -> Result<User> {
        self.client
            .send(RequestDescriptor::get("/users/me").accept_json())
            .await
    }

    /// Update the authenticated user.
    pub async fn update_me(&self, request: &UserUpdateRequest) -> Result<User> {
        self.client
            .send(RequestDescriptor::patch("/users/me").json(request)?)
            .await
    }

    /// Get a user by ID.
    pub async fn get(&self, user_id: &str) -> Result<User> {
        self.client
            .send(RequestDescriptor::get(format!("/users/{}", user_id)).accept_json())
            .await
    }

    /// Update a user by ID.
    pub async fn update(&self, user_id: &str, request: &UserUpdateRequest) -> Result<User> {
        self.client
            .send(RequestDescriptor::patch(format!("/users/{}", user_id)).json(request)?)
            .await
    }

    /// Delete a user by ID.
    pub async fn delete(&self, user_id: &str) -> Result<()> {
        self.client
            .send_empty(RequestDescriptor::delete(format!("/users/{}", user_id)))
            .await
    }
}
