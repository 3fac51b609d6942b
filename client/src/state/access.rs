//! Access-role state for the current deployment.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the sidebar to decide whether the database-connection and settings
//! affordances are enabled. Filled once from `/api/session` after hydration.

#[cfg(test)]
#[path = "access_test.rs"]
mod access_test;

use threads::permissions::AccessRole;

/// Role plus whether the host has answered yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessState {
    pub role: AccessRole,
    pub loaded: bool,
}

impl AccessState {
    pub fn apply(&mut self, role: AccessRole) {
        self.role = role;
        self.loaded = true;
    }

    /// Privileged controls stay disabled until the role is known.
    pub fn connect_db_enabled(&self) -> bool {
        self.loaded && self.role.can_configure_database()
    }

    pub fn settings_enabled(&self) -> bool {
        self.loaded && self.role.can_open_settings()
    }
}
