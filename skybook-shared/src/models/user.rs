use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Explicit role carried by an authenticated session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

/// An account record. Credential handling lives at the boundary and is not
/// modelled here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            role,
            created_at: Utc::now(),
        }
    }

    pub fn session(&self) -> Session {
        Session {
            user_id: self.id,
            role: self.role,
        }
    }
}

/// The authenticated principal the boundary layer hands to every operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
