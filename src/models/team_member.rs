//! Diesel models representing roster members.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::team_member::{
    NewTeamMember as DomainNewTeamMember, TeamMember as DomainTeamMember,
    UpdateTeamMember as DomainUpdateTeamMember,
};
use crate::domain::types::{MemberName, TypeConstraintError, UserEmail, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::team_members)]
/// Diesel model for [`crate::domain::team_member::TeamMember`].
pub struct TeamMember {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::team_members)]
/// Insertable form of [`TeamMember`].
pub struct NewTeamMember<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role: &'static str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::team_members)]
/// Data used when updating a [`TeamMember`] record.
pub struct UpdateTeamMember<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub role: Option<&'static str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<TeamMember> for DomainTeamMember {
    type Error = TypeConstraintError;

    fn try_from(member: TeamMember) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(member.id)?,
            name: MemberName::new(member.name)?,
            email: UserEmail::new(member.email)?,
            role: member.role.parse()?,
            created_at: member.created_at,
            updated_at: member.updated_at,
        })
    }
}

impl<'a> NewTeamMember<'a> {
    pub fn from_domain(member: &'a DomainNewTeamMember, now: NaiveDateTime) -> Self {
        Self {
            name: member.name.as_str(),
            email: member.email.as_str(),
            role: member.role.as_str(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateTeamMember<'a> {
    pub fn from_domain(member: &'a DomainUpdateTeamMember, now: NaiveDateTime) -> Self {
        Self {
            name: member.name.as_ref().map(MemberName::as_str),
            email: member.email.as_ref().map(UserEmail::as_str),
            role: member.role.map(|role| role.as_str()),
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::Role;

    #[test]
    fn from_domain_new_member() {
        let now = Utc::now().naive_utc();
        let domain = DomainNewTeamMember::new(
            MemberName::new("Alice").expect("valid name"),
            UserEmail::new("alice@example.com").expect("valid email"),
            Role::Team,
        );

        let new = NewTeamMember::from_domain(&domain, now);

        assert_eq!(new.name, "Alice");
        assert_eq!(new.email, "alice@example.com");
        assert_eq!(new.role, "team");
    }

    #[test]
    fn member_into_domain() {
        let now = Utc::now().naive_utc();
        let db = TeamMember {
            id: 1,
            name: "Bob".into(),
            email: "b@c.d".into(),
            role: "admin".into(),
            created_at: now,
            updated_at: now,
        };

        let domain = DomainTeamMember::try_from(db).expect("valid member");

        assert_eq!(domain.id.get(), 1);
        assert_eq!(domain.name.as_str(), "Bob");
        assert_eq!(domain.role, Role::Admin);
    }
}
