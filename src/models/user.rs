//! User model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::errors::VolunteerHubError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Volunteer,
    /// Any role string this client does not know; never treated as admin
    #[serde(other)]
    Other,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Volunteer => f.write_str("volunteer"),
            Role::Other => f.write_str("other"),
        }
    }
}

impl FromStr for Role {
    type Err = VolunteerHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "volunteer" => Ok(Role::Volunteer),
            other => Err(VolunteerHubError::InvalidInput(format!("Unknown role: {}", other))),
        }
    }
}

/// Cached profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response; the profile is either nested under `user` or flattened
/// next to the token.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<LoginUser>,
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl LoginResponse {
    /// Merge nested and top-level fields into a profile, nested winning.
    /// Returns `None` when neither carries a user id.
    pub fn profile(&self) -> Option<UserProfile> {
        let nested = self.user.as_ref();
        let id = nested.and_then(|u| u.id.clone()).or_else(|| self.id.clone())?;

        Some(UserProfile {
            id,
            name: nested.and_then(|u| u.name.clone()).or_else(|| self.name.clone()),
            email: nested.and_then(|u| u.email.clone()).or_else(|| self.email.clone()),
            role: nested
                .and_then(|u| u.role)
                .or(self.role)
                .unwrap_or_default(),
        })
    }
}
