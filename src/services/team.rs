//! Services handling the team roster.

use crate::domain::actor::Actor;
use crate::domain::team_member::{NewTeamMember, UpdateTeamMember};
use crate::domain::types::UserId;
use crate::dto::team::TeamMemberView;
use crate::forms::team::{AddTeamMemberForm, UpdateTeamMemberForm};
use crate::repository::{TeamMemberReader, TeamMemberWriter};
use crate::services::scope::require_admin;
use crate::services::{ServiceError, ServiceResult};

fn member_id(id: i32) -> ServiceResult<UserId> {
    UserId::new(id).map_err(|_| ServiceError::NotFound)
}

fn duplicate_email() -> ServiceError {
    ServiceError::Validation(vec!["email".to_string()])
}

/// Whole roster, newest first.
pub fn list_team_members<R>(repo: &R, actor: &Actor) -> ServiceResult<Vec<TeamMemberView>>
where
    R: TeamMemberReader + ?Sized,
{
    require_admin(actor)?;

    let members = repo.list_team_members()?;

    Ok(members.into_iter().map(TeamMemberView::from).collect())
}

/// Any authenticated actor may look up a single member.
pub fn get_team_member<R>(repo: &R, _actor: &Actor, id: i32) -> ServiceResult<TeamMemberView>
where
    R: TeamMemberReader + ?Sized,
{
    let member = repo
        .get_team_member_by_id(member_id(id)?)?
        .ok_or(ServiceError::NotFound)?;

    Ok(member.into())
}

pub fn add_team_member<R>(
    repo: &R,
    actor: &Actor,
    form: AddTeamMemberForm,
) -> ServiceResult<TeamMemberView>
where
    R: TeamMemberReader + TeamMemberWriter + ?Sized,
{
    require_admin(actor)?;

    let new_member = NewTeamMember::try_from(form)?;

    if repo.get_team_member_by_email(&new_member.email)?.is_some() {
        return Err(duplicate_email());
    }

    let member = repo.create_team_member(&new_member).map_err(|err| {
        log::error!("Failed to add team member: {err}");
        err
    })?;

    log::info!("Team member {} added by user {}", member.id, actor.user_id);

    Ok(member.into())
}

pub fn update_team_member<R>(
    repo: &R,
    actor: &Actor,
    id: i32,
    form: UpdateTeamMemberForm,
) -> ServiceResult<TeamMemberView>
where
    R: TeamMemberReader + TeamMemberWriter + ?Sized,
{
    require_admin(actor)?;

    let id = member_id(id)?;
    let updates = UpdateTeamMember::try_from(form)?;

    if let Some(email) = &updates.email {
        let taken = repo
            .get_team_member_by_email(email)?
            .is_some_and(|existing| existing.id != id);
        if taken {
            return Err(duplicate_email());
        }
    }

    let member = repo.update_team_member(id, &updates)?;

    Ok(member.into())
}

/// Removes a member. Clients keep referring to the removed id.
pub fn delete_team_member<R>(repo: &R, actor: &Actor, id: i32) -> ServiceResult<()>
where
    R: TeamMemberWriter + ?Sized,
{
    require_admin(actor)?;

    let id = member_id(id)?;

    if id == actor.user_id {
        return Err(ServiceError::Validation(vec!["id".to_string()]));
    }

    if !repo.delete_team_member(id)? {
        return Err(ServiceError::NotFound);
    }

    log::info!("Team member {id} deleted by user {}", actor.user_id);

    Ok(())
}
