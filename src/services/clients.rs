//! Services handling client records.

use std::collections::HashMap;

use crate::domain::actor::Actor;
use crate::domain::client::{Client, ClientPatch};
use crate::domain::types::{ClientId, UserId};
use crate::dto::client::{ClientView, ClientsQuery, referenced_users};
use crate::forms::client::{CreateClientForm, CreateClientPayload, UpdateClientForm};
use crate::repository::{ClientReader, ClientWriter, TeamMemberReader};
use crate::services::scope::{
    authorize_assignment, authorize_client, authorize_requested_assignment, permitted_patch,
    require_admin, scope_filter,
};
use crate::services::{ServiceError, ServiceResult};

/// Resolves every user reference of `clients` against the roster.
pub(crate) fn present_clients<R>(repo: &R, clients: Vec<Client>) -> ServiceResult<Vec<ClientView>>
where
    R: TeamMemberReader + ?Sized,
{
    let users = repo
        .list_team_members_by_ids(&referenced_users(&clients))?
        .into_iter()
        .map(|member| (member.id, member))
        .collect::<HashMap<_, _>>();

    Ok(clients
        .into_iter()
        .map(|client| ClientView::new(client, &users))
        .collect())
}

pub(crate) fn present_client<R>(repo: &R, client: Client) -> ServiceResult<ClientView>
where
    R: TeamMemberReader + ?Sized,
{
    present_clients(repo, vec![client])?
        .pop()
        .ok_or(ServiceError::Internal)
}

/// Loads a client the actor is allowed to see.
///
/// Missing clients yield `NotFound` before any role check.
pub(crate) fn load_authorized<R>(repo: &R, actor: &Actor, id: i32) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    let id = ClientId::new(id).map_err(|_| ServiceError::NotFound)?;
    let client = repo.get_client_by_id(id)?.ok_or(ServiceError::NotFound)?;
    authorize_client(actor, &client)?;
    Ok(client)
}

fn ensure_roster_member<R>(repo: &R, user_id: UserId) -> ServiceResult<()>
where
    R: TeamMemberReader + ?Sized,
{
    match repo.get_team_member_by_id(user_id)? {
        Some(_) => Ok(()),
        None => Err(ServiceError::Validation(vec!["assignedTo".to_string()])),
    }
}

/// Lists the clients visible to the actor, newest assigned visit first.
pub fn list_clients<R>(
    repo: &R,
    actor: &Actor,
    query: ClientsQuery,
) -> ServiceResult<Vec<ClientView>>
where
    R: ClientReader + TeamMemberReader + ?Sized,
{
    let filter = scope_filter(actor, query.into_filter());
    let clients = repo.list_clients(&filter)?;
    present_clients(repo, clients)
}

pub fn get_client<R>(repo: &R, actor: &Actor, id: i32) -> ServiceResult<ClientView>
where
    R: ClientReader + TeamMemberReader + ?Sized,
{
    let client = load_authorized(repo, actor, id)?;
    present_client(repo, client)
}

/// Validates the form and creates the client with its pending seed visit.
pub fn create_client<R>(repo: &R, actor: &Actor, form: CreateClientForm) -> ServiceResult<ClientView>
where
    R: ClientWriter + TeamMemberReader + ?Sized,
{
    authorize_requested_assignment(actor, form.assigned_to)?;
    let payload = CreateClientPayload::try_from(form)?;

    authorize_assignment(actor, payload.assigned_to)?;
    ensure_roster_member(repo, payload.assigned_to)?;

    let client = repo
        .create_client(&payload.into_domain(actor.user_id))
        .map_err(|err| {
            log::error!("Failed to create client: {err}");
            err
        })?;

    log::info!("Client {} created by user {}", client.id, actor.user_id);

    present_client(repo, client)
}

/// Applies the defined fields of the form to the client.
///
/// Access to the client is checked before the body is validated.
pub fn update_client<R>(
    repo: &R,
    actor: &Actor,
    id: i32,
    form: UpdateClientForm,
) -> ServiceResult<ClientView>
where
    R: ClientReader + ClientWriter + TeamMemberReader + ?Sized,
{
    let client = load_authorized(repo, actor, id)?;
    authorize_requested_assignment(actor, form.assigned_to)?;
    let patch = permitted_patch(actor, ClientPatch::try_from(form)?)?;

    if let Some(assigned_to) = patch.assigned_to {
        ensure_roster_member(repo, assigned_to)?;
    }
    if !patch.summary.is_empty() {
        log::info!(
            "Admin {} overrides summary of client {}: {:?}",
            actor.user_id,
            client.id,
            patch.summary
        );
    }

    let updated = repo.update_client(client.id, &patch).map_err(|err| {
        log::error!("Failed to update client {}: {err}", client.id);
        err
    })?;

    present_client(repo, updated)
}

pub fn delete_client<R>(repo: &R, actor: &Actor, id: i32) -> ServiceResult<()>
where
    R: ClientWriter + ?Sized,
{
    require_admin(actor)?;

    let id = ClientId::new(id).map_err(|_| ServiceError::NotFound)?;

    if !repo.delete_client(id)? {
        return Err(ServiceError::NotFound);
    }

    log::info!("Client {id} deleted by user {}", actor.user_id);

    Ok(())
}

/// Re-derives the summary fields from the ledger, undoing any override.
pub fn recompute_client<R>(repo: &R, actor: &Actor, id: i32) -> ServiceResult<ClientView>
where
    R: ClientWriter + TeamMemberReader + ?Sized,
{
    require_admin(actor)?;

    let id = ClientId::new(id).map_err(|_| ServiceError::NotFound)?;
    let client = repo.recompute_summary(id)?;

    present_client(repo, client)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::types::{ClientStatus, MeetingStatus, Role};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin, client, day, member, team, user};

    fn create_form(assigned_to: i32) -> CreateClientForm {
        CreateClientForm {
            name: Some("Acme".to_string()),
            address: Some("1 Main St".to_string()),
            phone: Some("555-0100".to_string()),
            map_location_link: None,
            assigned_to: Some(assigned_to),
            assigned_visit_date: Some("2024-06-01".to_string()),
        }
    }

    #[test]
    fn create_rejects_incomplete_form_before_touching_storage() {
        let mut repo = MockRepository::new();
        repo.expect_create_client().times(0);

        let result = create_client(&repo, &admin(), CreateClientForm::default());

        match result {
            Err(ServiceError::Validation(fields)) => assert_eq!(fields.len(), 5),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn team_member_cannot_create_for_someone_else() {
        let mut repo = MockRepository::new();
        repo.expect_create_client().times(0);

        let result = create_client(&repo, &team(2), create_form(3));

        assert!(matches!(result, Err(ServiceError::AccessDenied)));
    }

    #[test]
    fn create_requires_existing_assignee() {
        let mut repo = MockRepository::new();
        repo.expect_get_team_member_by_id().returning(|_| Ok(None));
        repo.expect_create_client().times(0);

        let result = create_client(&repo, &admin(), create_form(3));

        assert!(matches!(result, Err(ServiceError::Validation(f)) if f == vec!["assignedTo"]));
    }

    #[test]
    fn create_sets_creator_and_resolves_users() {
        let mut repo = MockRepository::new();
        repo.expect_get_team_member_by_id()
            .returning(|id| Ok(Some(member(id.get(), Role::Team))));
        repo.expect_create_client()
            .withf(|new_client| {
                new_client.created_by == user(1)
                    && new_client.assigned_to == user(3)
                    && new_client.assigned_visit_date == day(1)
            })
            .times(1)
            .returning(|_| Ok(client(10, 3)));
        repo.expect_list_team_members_by_ids()
            .returning(|_| Ok(vec![member(1, Role::Admin), member(3, Role::Team)]));

        let view = create_client(&repo, &admin(), create_form(3)).expect("client is created");

        assert_eq!(view.id, 10);
        assert_eq!(view.assigned_to.name.as_deref(), Some("Member 3"));
        assert_eq!(view.meeting_status, MeetingStatus::Pending);
    }

    #[test]
    fn get_other_members_client_is_denied() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(client(5, 2))));

        let result = get_client(&repo, &team(3), 5);

        assert!(matches!(result, Err(ServiceError::AccessDenied)));
    }

    #[test]
    fn get_missing_client_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().returning(|_| Ok(None));

        assert!(matches!(
            get_client(&repo, &team(3), 5),
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            get_client(&repo, &admin(), 0),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn list_is_scoped_for_team_members() {
        let mut repo = MockRepository::new();
        repo.expect_list_clients()
            .withf(|filter| filter.assigned_to == Some(user(2)))
            .times(1)
            .returning(|_| Ok(vec![client(5, 2)]));
        repo.expect_list_team_members_by_ids()
            .returning(|_| Ok(Vec::new()));
        let query = ClientsQuery {
            assigned_to: Some("9".to_string()),
            ..ClientsQuery::default()
        };

        let clients = list_clients(&repo, &team(2), query).expect("clients are listed");

        assert_eq!(clients.len(), 1);
    }

    #[test]
    fn team_summary_override_is_ignored() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(client(5, 2))));
        repo.expect_update_client()
            .withf(|_, patch| patch.summary.is_empty() && patch.phone.is_some())
            .times(1)
            .returning(|_, _| Ok(client(5, 2)));
        repo.expect_list_team_members_by_ids()
            .returning(|_| Ok(Vec::new()));
        let form = UpdateClientForm {
            phone: Some("555-0199".to_string()),
            meeting_status: Some("visited".to_string()),
            ..UpdateClientForm::default()
        };

        update_client(&repo, &team(2), 5, form).expect("update succeeds");
    }

    #[test]
    fn admin_summary_override_is_written() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(client(5, 2))));
        repo.expect_update_client()
            .withf(|_, patch| patch.summary.client_status == Some(ClientStatus::Registered))
            .times(1)
            .returning(|_, _| Ok(client(5, 2)));
        repo.expect_list_team_members_by_ids()
            .returning(|_| Ok(Vec::new()));
        let form = UpdateClientForm {
            client_status: Some("registered".to_string()),
            ..UpdateClientForm::default()
        };

        update_client(&repo, &admin(), 5, form).expect("update succeeds");
    }

    #[test]
    fn delete_requires_admin() {
        let mut repo = MockRepository::new();
        repo.expect_delete_client().times(0);

        assert!(matches!(
            delete_client(&repo, &team(2), 5),
            Err(ServiceError::AccessDenied)
        ));
    }

    #[test]
    fn delete_missing_client_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_delete_client().returning(|_| Ok(false));

        assert!(matches!(
            delete_client(&repo, &admin(), 5),
            Err(ServiceError::NotFound)
        ));
    }
}
