use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a user, from most to least privileged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Moderator,
    #[default]
    Default,
}

impl UserRole {
    /// Numeric code stored by the relational schema.
    pub fn code(self) -> i32 {
        match self {
            UserRole::Admin => 0,
            UserRole::Moderator => 1,
            UserRole::Default => 2,
        }
    }

    /// Unknown codes fall back to the least privileged role.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => UserRole::Admin,
            1 => UserRole::Moderator,
            _ => UserRole::Default,
        }
    }
}

/// User entity - anyone who writes or reads the blog.
///
/// Posts only reference users by id; the post repository never creates or
/// removes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub nick: String,
    pub email: String,
    pub role: UserRole,
    pub salt: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn can_moderate(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Moderator)
    }
}
