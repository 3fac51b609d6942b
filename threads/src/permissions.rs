//! Access role for the two privileged affordances (database setup and the
//! settings button). The role comes from deployment configuration.

#[cfg(test)]
#[path = "permissions_test.rs"]
mod permissions_test;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRole {
    Admin,
    #[default]
    Member,
}

impl AccessRole {
    /// Parse a configured role name. Unknown names are `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "member" => Some(Self::Member),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    #[must_use]
    pub fn can_configure_database(self) -> bool {
        matches!(self, Self::Admin)
    }

    #[must_use]
    pub fn can_open_settings(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Browser path serving [`SessionInfo`].
pub const SESSION_PATH: &str = "/api/session";

/// What the host tells the browser about the current deployment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub role: AccessRole,
}
