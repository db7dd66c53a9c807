use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::client::{Client, ClientPatch, NewClient};
use crate::domain::team_member::{NewTeamMember, TeamMember, UpdateTeamMember};
use crate::domain::types::{ClientId, ClientStatus, MeetingStatus, UserEmail, UserId};
use crate::domain::visit::NewVisitEntry;
use crate::repository::errors::RepositoryResult;

pub mod client;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod team_member;
pub mod visit_entry;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

/// Inclusive range of `assigned_visit_date` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Whole calendar day from 00:00:00.000 to 23:59:59.999.
    ///
    /// Stored timestamps are naive UTC, so `day` is a UTC calendar day and
    /// not the agent's local one.
    pub fn for_day(day: NaiveDate) -> Self {
        let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        Self {
            start: day.and_time(NaiveTime::MIN),
            end: day.and_time(end),
        }
    }
}

/// Typed client query. Every `None` field leaves that dimension unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    pub assigned_to: Option<UserId>,
    pub date_range: Option<DateRange>,
    pub meeting_status: Option<MeetingStatus>,
    pub client_status: Option<ClientStatus>,
}

impl ClientFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assigned_to(mut self, user_id: UserId) -> Self {
        self.assigned_to = Some(user_id);
        self
    }

    pub fn on_day(mut self, day: NaiveDate) -> Self {
        self.date_range = Some(DateRange::for_day(day));
        self
    }

    pub fn meeting_status(mut self, status: MeetingStatus) -> Self {
        self.meeting_status = Some(status);
        self
    }

    pub fn client_status(mut self, status: ClientStatus) -> Self {
        self.client_status = Some(status);
        self
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    /// Clients matching `filter`, newest assigned visit first, with full ledgers.
    fn list_clients(&self, filter: &ClientFilter) -> RepositoryResult<Vec<Client>>;
    fn count_clients(&self, filter: &ClientFilter) -> RepositoryResult<usize>;
}

pub trait ClientWriter {
    /// Inserts the client and its seed ledger entry in one transaction.
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    fn update_client(&self, id: ClientId, patch: &ClientPatch) -> RepositoryResult<Client>;
    /// Returns `false` when no such client existed.
    fn delete_client(&self, id: ClientId) -> RepositoryResult<bool>;
    /// Re-derives the summary fields from the whole ledger and stores them.
    fn recompute_summary(&self, id: ClientId) -> RepositoryResult<Client>;
}

pub trait VisitLedgerWriter {
    /// Appends `entry` and rewrites the derived summary atomically.
    ///
    /// With `assignee` set, the client must still be assigned to that user
    /// once the write lock is held, otherwise [`RepositoryError::NotAssigned`]
    /// is returned and nothing is written.
    ///
    /// [`RepositoryError::NotAssigned`]: crate::repository::errors::RepositoryError::NotAssigned
    fn append_visit(
        &self,
        id: ClientId,
        assignee: Option<UserId>,
        entry: &NewVisitEntry,
    ) -> RepositoryResult<Client>;
}

pub trait TeamMemberReader {
    fn get_team_member_by_id(&self, id: UserId) -> RepositoryResult<Option<TeamMember>>;
    fn get_team_member_by_email(&self, email: &UserEmail)
    -> RepositoryResult<Option<TeamMember>>;
    /// Whole roster, newest first.
    fn list_team_members(&self) -> RepositoryResult<Vec<TeamMember>>;
    /// Members among `ids` that still exist. Missing ids are skipped.
    fn list_team_members_by_ids(&self, ids: &[UserId]) -> RepositoryResult<Vec<TeamMember>>;
}

pub trait TeamMemberWriter {
    fn create_team_member(&self, new_member: &NewTeamMember) -> RepositoryResult<TeamMember>;
    fn update_team_member(
        &self,
        id: UserId,
        updates: &UpdateTeamMember,
    ) -> RepositoryResult<TeamMember>;
    /// Returns `false` when no such member existed.
    fn delete_team_member(&self, id: UserId) -> RepositoryResult<bool>;
}
