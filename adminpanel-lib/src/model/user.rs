//! User, role and login records

use serde::Deserialize;
use serde::Serialize;

/// A user as listed by `GET /api/usuarios`.
///
/// Only the fields the panel reads are modelled; anything else the backend
/// sends is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Primary key.
    #[serde(rename = "id_usuario")]
    pub id: i64,
    /// Display and login name. Unique across users.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Contact email, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Assigned role.
    #[serde(rename = "id_rol", default)]
    pub role_id: Option<i64>,
    /// Whether the account may sign in.
    #[serde(rename = "estado", default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Payload sent to create or update a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    /// Omitted when editing, where the password is not changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "id_rol")]
    pub role_id: String,
}

/// A selectable role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Role {
    #[serde(rename = "id_rol")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Body returned by `POST /api/usuarios/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    #[serde(rename = "nombre")]
    pub name: &'a str,
    pub password: &'a str,
}
