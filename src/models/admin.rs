use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdminRole {
    #[default]
    Admin,
    SuperAdmin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    /// bcrypt hash, never the plain password.
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default)]
    pub role: AdminRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
}

/// JWT payload for admin sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub username: String,
    pub role: AdminRole,
    pub exp: usize,
}

/// The authenticated admin for the current request, inserted by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub role: AdminRole,
}

impl CurrentAdmin {
    pub fn is_super_admin(&self) -> bool {
        self.role == AdminRole::SuperAdmin
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterAdmin {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Option<AdminRole>,
}

#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: AdminRole,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub admin: AdminResponse,
}

impl From<&CurrentAdmin> for AdminResponse {
    fn from(admin: &CurrentAdmin) -> Self {
        AdminResponse {
            id: admin.id.to_hex(),
            username: admin.username.clone(),
            email: admin.email.clone(),
            role: admin.role,
        }
    }
}
