use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::team_member::TeamMember;
use crate::domain::types::Role;

/// Roster member as rendered by the API.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<TeamMember> for TeamMemberView {
    fn from(member: TeamMember) -> Self {
        Self {
            id: member.id.get(),
            name: member.name.into_inner(),
            email: member.email.into_inner(),
            role: member.role,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMembersResponse {
    pub team_members: Vec<TeamMemberView>,
}

#[derive(Debug, Serialize)]
pub struct TeamMemberResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub user: TeamMemberView,
}
