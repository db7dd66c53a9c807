//! Roster management bodies.

use serde::Deserialize;

use crate::domain::team_member::{NewTeamMember, UpdateTeamMember};
use crate::domain::types::{MemberName, Role, UserEmail};
use crate::forms::{FieldErrors, FormError, non_blank};

#[derive(Debug, Default, Deserialize)]
/// Form data for adding a roster member.
pub struct AddTeamMemberForm {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `admin` or `team`.
    pub role: Option<String>,
}

impl TryFrom<AddTeamMemberForm> for NewTeamMember {
    type Error = FormError;

    fn try_from(form: AddTeamMemberForm) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::default();

        let name = errors.require("name", non_blank(form.name).map(MemberName::new));
        let email = errors.require("email", non_blank(form.email).map(UserEmail::new));
        let role = errors.require("role", non_blank(form.role).map(|r| r.trim().parse::<Role>()));

        errors.finish()?;

        match (name, email, role) {
            (Some(name), Some(email), Some(role)) => Ok(NewTeamMember::new(name, email, role)),
            _ => Err(FormError::InvalidFields(vec!["body".to_string()])),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// Form data for editing a roster member. Blank fields are left untouched.
pub struct UpdateTeamMemberForm {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Unrecognised roles are ignored.
    pub role: Option<String>,
}

impl TryFrom<UpdateTeamMemberForm> for UpdateTeamMember {
    type Error = FormError;

    fn try_from(form: UpdateTeamMemberForm) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::default();

        let name = non_blank(form.name).and_then(|n| errors.check("name", MemberName::new(n)));
        let email = non_blank(form.email).and_then(|e| errors.check("email", UserEmail::new(e)));
        let role = form.role.and_then(|r| r.trim().parse::<Role>().ok());

        errors.finish()?;

        Ok(UpdateTeamMember { name, email, role })
    }
}
