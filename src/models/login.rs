//! Login request/response models.

use serde::{Deserialize, Serialize};

use crate::models::entity::EntityId;

/// Login request body for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response from the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Authenticated user information.
    pub user: SessionUser,
    /// Bearer token for subsequent API calls.
    pub access_token: String,
    /// Token expiration in RFC3339 format, when the server reports it.
    #[serde(default)]
    pub expires_at: Option<String>,
    /// Longer-lived token used by the refresh collaborator.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// User identity carried in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: EntityId,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
}
