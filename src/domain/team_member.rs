use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{MemberName, Role, UserEmail, UserId};

/// Roster entry for a user who can be assigned clients.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    pub id: UserId,
    pub name: MemberName,
    pub email: UserEmail,
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewTeamMember {
    pub name: MemberName,
    pub email: UserEmail,
    pub role: Role,
}

impl NewTeamMember {
    #[must_use]
    pub fn new(name: MemberName, email: UserEmail, role: Role) -> Self {
        Self { name, email, role }
    }
}

/// Partial roster update. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateTeamMember {
    pub name: Option<MemberName>,
    pub email: Option<UserEmail>,
    pub role: Option<Role>,
}
