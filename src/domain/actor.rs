//! Identity context handed to every core operation.

use serde::{Deserialize, Serialize};

use crate::domain::types::{Role, UserId};

/// Authenticated identity performing an operation.
///
/// Supplied per call by the identity adapter and never mutated by the core.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
