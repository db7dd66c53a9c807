//! Repository implementation for the team roster.

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::team_member::{NewTeamMember, TeamMember, UpdateTeamMember};
use crate::domain::types::{UserEmail, UserId};
use crate::models::team_member::{
    NewTeamMember as DbNewTeamMember, TeamMember as DbTeamMember,
    UpdateTeamMember as DbUpdateTeamMember,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TeamMemberReader, TeamMemberWriter};
use crate::schema::team_members;

impl TeamMemberReader for DieselRepository {
    fn get_team_member_by_id(&self, id: UserId) -> RepositoryResult<Option<TeamMember>> {
        let mut conn = self.conn()?;

        let member = team_members::table
            .find(id.get())
            .select(DbTeamMember::as_select())
            .first::<DbTeamMember>(&mut conn)
            .optional()?;

        Ok(member.map(TeamMember::try_from).transpose()?)
    }

    fn get_team_member_by_email(
        &self,
        email: &UserEmail,
    ) -> RepositoryResult<Option<TeamMember>> {
        let mut conn = self.conn()?;

        let member = team_members::table
            .filter(team_members::email.eq(email.as_str()))
            .select(DbTeamMember::as_select())
            .first::<DbTeamMember>(&mut conn)
            .optional()?;

        Ok(member.map(TeamMember::try_from).transpose()?)
    }

    fn list_team_members(&self) -> RepositoryResult<Vec<TeamMember>> {
        let mut conn = self.conn()?;

        let members = team_members::table
            .order((team_members::created_at.desc(), team_members::id.desc()))
            .select(DbTeamMember::as_select())
            .load::<DbTeamMember>(&mut conn)?;

        members
            .into_iter()
            .map(|m| TeamMember::try_from(m).map_err(RepositoryError::from))
            .collect()
    }

    fn list_team_members_by_ids(&self, ids: &[UserId]) -> RepositoryResult<Vec<TeamMember>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();

        let members = team_members::table
            .filter(team_members::id.eq_any(raw_ids))
            .select(DbTeamMember::as_select())
            .load::<DbTeamMember>(&mut conn)?;

        members
            .into_iter()
            .map(|m| TeamMember::try_from(m).map_err(RepositoryError::from))
            .collect()
    }
}

impl TeamMemberWriter for DieselRepository {
    fn create_team_member(&self, new_member: &NewTeamMember) -> RepositoryResult<TeamMember> {
        let mut conn = self.conn()?;

        let member = diesel::insert_into(team_members::table)
            .values(&DbNewTeamMember::from_domain(new_member, Utc::now().naive_utc()))
            .get_result::<DbTeamMember>(&mut conn)?;

        Ok(TeamMember::try_from(member)?)
    }

    fn update_team_member(
        &self,
        id: UserId,
        updates: &UpdateTeamMember,
    ) -> RepositoryResult<TeamMember> {
        let mut conn = self.conn()?;

        let member = diesel::update(team_members::table.find(id.get()))
            .set(&DbUpdateTeamMember::from_domain(updates, Utc::now().naive_utc()))
            .get_result::<DbTeamMember>(&mut conn)?;

        Ok(TeamMember::try_from(member)?)
    }

    fn delete_team_member(&self, id: UserId) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(team_members::table.find(id.get())).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
