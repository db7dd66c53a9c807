//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::client::{Client, ClientPatch, NewClient};
use crate::domain::team_member::{NewTeamMember, TeamMember, UpdateTeamMember};
use crate::domain::types::{ClientId, UserEmail, UserId};
use crate::domain::visit::NewVisitEntry;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ClientFilter, ClientReader, ClientWriter, TeamMemberReader, TeamMemberWriter,
    VisitLedgerWriter,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, filter: &ClientFilter) -> RepositoryResult<Vec<Client>>;
        fn count_clients(&self, filter: &ClientFilter) -> RepositoryResult<usize>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
        fn update_client(&self, id: ClientId, patch: &ClientPatch) -> RepositoryResult<Client>;
        fn delete_client(&self, id: ClientId) -> RepositoryResult<bool>;
        fn recompute_summary(&self, id: ClientId) -> RepositoryResult<Client>;
    }

    impl VisitLedgerWriter for Repository {
        fn append_visit(
            &self,
            id: ClientId,
            assignee: Option<UserId>,
            entry: &NewVisitEntry,
        ) -> RepositoryResult<Client>;
    }

    impl TeamMemberReader for Repository {
        fn get_team_member_by_id(&self, id: UserId) -> RepositoryResult<Option<TeamMember>>;
        fn get_team_member_by_email(
            &self,
            email: &UserEmail,
        ) -> RepositoryResult<Option<TeamMember>>;
        fn list_team_members(&self) -> RepositoryResult<Vec<TeamMember>>;
        fn list_team_members_by_ids(&self, ids: &[UserId]) -> RepositoryResult<Vec<TeamMember>>;
    }

    impl TeamMemberWriter for Repository {
        fn create_team_member(&self, new_member: &NewTeamMember) -> RepositoryResult<TeamMember>;
        fn update_team_member(
            &self,
            id: UserId,
            updates: &UpdateTeamMember,
        ) -> RepositoryResult<TeamMember>;
        fn delete_team_member(&self, id: UserId) -> RepositoryResult<bool>;
    }
}
