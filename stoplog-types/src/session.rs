//! Authenticated-identity handle consumed by the sync layer.

use crate::UserId;

/// Opaque session handle handed to the orchestrator at sign-in.
///
/// Guest sessions never touch remote persistence; their state lives only
/// in memory for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub user_id: UserId,
    pub is_guest: bool,
}

impl UserSession {
    /// Session for a signed-in account with remote persistence.
    pub fn authenticated(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            is_guest: false,
        }
    }

    /// Local-only guest session.
    pub fn guest(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            is_guest: true,
        }
    }
}
