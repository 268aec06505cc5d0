//! Auth API.

use crate::client::CogneeClient;
use crate::error::Result;
use crate::gateway::RequestDescriptor;
use crate::types::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, RequestVerifyTokenRequest,
    ResetPasswordRequest, User, VerifyRequest,
};

/// Auth API client.
///
/// A successful login also sets the server's session cookie, which the
/// default transport keeps and sends on later requests.
pub struct AuthApi {
    client: CogneeClient,
}

impl AuthApi {
    pub(crate) fn new(client: CogneeClient) -> Self {
        Self { client }
    }

    /// Log in with a username (email) and password.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        let form = vec![
            ("username".to_string(), credentials.username.clone()),
            ("password".to_string(), credentials.password.clone()),
        ];
        self.client
            .send(RequestDescriptor::post("/auth/login").form(form))
            .await
    }

    /// End the current session.
    pub async fn logout(&self) -> Result<()> {
        self.client
            .send_empty(RequestDescriptor::post("/auth/logout"))
            .await
    }

    /// Register a new account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        self.client
            .send(RequestDescriptor::post("/auth/register").json(request)?)
            .await
    }

    /// Request a password reset email.
    pub async fn forgot_password(&self, email: impl Into<String>) -> Result<()> {
        let request = ForgotPasswordRequest {
            email: email.into(),
        };
        self.client
            .send_empty(RequestDescriptor::post("/auth/forgot-password").json(&request)?)
            .await
    }

    /// Reset a password with a token from the reset email.
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<()> {
        self.client
            .send_empty(RequestDescriptor::post("/auth/reset-password").json(request)?)
            .await
    }

    /// Request an email verification token.
    pub async fn request_verify_token(&self, email: impl Into<String>) -> Result<()> {
        let request = RequestVerifyTokenRequest {
            email: email.into(),
        };
        self.client
            .send_empty(RequestDescriptor::post("/auth/request-verify-token").json(&request)?)
            .await
    }

    /// Verify an email address.
    pub async fn verify(&self, token: impl Into<String>) -> Result<User> {
        let request = VerifyRequest {
            token: token.into(),
        };
        self.client
            .send(RequestDescriptor::post("/auth/verify").json(&request)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::mock_client;
    use crate::transport::{HttpResponse, RequestBody};
    use reqwest::StatusCode;
    use reqwest::header::CONTENT_TYPE;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_sends_urlencoded_form() {
        let (client, mock) = mock_client(vec![HttpResponse::json(
            StatusCode::OK,
            &json!({"access_token": "abc", "token_type": "bearer"}),
        )]);

        let token = client
            .auth()
            .login(&LoginRequest::new("me@example.com", "hunter2"))
            .await
            .unwrap();
        assert_eq!(token.access_token, "abc");

        let request = mock.last_request().unwrap();
        assert_eq!(request.url.path(), "/api/v1/auth/login");
        assert_eq!(
            request.headers[CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        assert_eq!(
            request.body,
            RequestBody::Form(vec![
                ("username".to_string(), "me@example.com".to_string()),
                ("password".to_string(), "hunter2".to_string()),
            ])
        );
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let (client, _mock) = mock_client(vec![HttpResponse::json(
            StatusCode::BAD_REQUEST,
            &json!({"message": "LOGIN_BAD_CREDENTIALS"}),
        )]);

        let err = client
            .auth()
            .login(&LoginRequest::new("me@example.com", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.as_gateway().unwrap().message, "LOGIN_BAD_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_forgot_password_json_body() {
        let (client, mock) = mock_client(vec![HttpResponse::new(StatusCode::ACCEPTED, "")]);

        client.auth().forgot_password("me@example.com").await.unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.url.path(), "/api/v1/auth/forgot-password");
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(request.body, RequestBody::Json(json!({"email": "me@example.com"})));
    }
}
