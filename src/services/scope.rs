//! Role-based access scope.
//!
//! Admins see and change everything. Team members see only the clients
//! assigned to them and can neither reassign clients to someone else nor
//! override the ledger-derived summary. No other module inspects roles.

use crate::domain::actor::Actor;
use crate::domain::client::{Client, ClientPatch, SummaryOverride};
use crate::domain::types::UserId;
use crate::repository::ClientFilter;
use crate::services::{ServiceError, ServiceResult};

/// Narrows `requested` to what `actor` may see.
pub fn scope_filter(actor: &Actor, requested: ClientFilter) -> ClientFilter {
    if actor.is_admin() {
        requested
    } else {
        requested.assigned_to(actor.user_id)
    }
}

pub fn authorize_client(actor: &Actor, client: &Client) -> ServiceResult<()> {
    if actor.is_admin() || client.assigned_to == actor.user_id {
        Ok(())
    } else {
        Err(ServiceError::AccessDenied)
    }
}

pub fn authorize_assignment(actor: &Actor, assigned_to: UserId) -> ServiceResult<()> {
    if actor.is_admin() || assigned_to == actor.user_id {
        Ok(())
    } else {
        Err(ServiceError::AccessDenied)
    }
}

/// Checks an `assignedTo` value straight from a request body, before the
/// rest of the body is validated. Malformed ids are left to validation.
pub fn authorize_requested_assignment(
    actor: &Actor,
    requested: Option<i32>,
) -> ServiceResult<()> {
    match requested.map(UserId::new) {
        Some(Ok(assigned_to)) => authorize_assignment(actor, assigned_to),
        _ => Ok(()),
    }
}

/// Assignee a ledger write must still match once the write lock is held.
/// Admins may write to any client.
pub fn required_assignee(actor: &Actor) -> Option<UserId> {
    (!actor.is_admin()).then_some(actor.user_id)
}

/// Applies the role's write rules to a client patch.
pub fn permitted_patch(actor: &Actor, mut patch: ClientPatch) -> ServiceResult<ClientPatch> {
    if let Some(assigned_to) = patch.assigned_to {
        authorize_assignment(actor, assigned_to)?;
    }

    if !actor.is_admin() && !patch.summary.is_empty() {
        log::warn!(
            "Ignoring summary override from team member {}: {:?}",
            actor.user_id,
            patch.summary
        );
        patch.summary = SummaryOverride::default();
    }

    Ok(patch)
}

pub fn require_admin(actor: &Actor) -> ServiceResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ClientStatus, MeetingStatus, Role};

    fn admin() -> Actor {
        Actor::new(UserId::new(1).expect("valid user id"), Role::Admin)
    }

    fn team(id: i32) -> Actor {
        Actor::new(UserId::new(id).expect("valid user id"), Role::Team)
    }

    #[test]
    fn team_filter_is_forced_to_self() {
        let other = UserId::new(9).expect("valid user id");
        let filter = scope_filter(&team(2), ClientFilter::new().assigned_to(other));
        assert_eq!(filter.assigned_to, UserId::new(2).ok());
    }

    #[test]
    fn admin_filter_is_unchanged() {
        let requested = ClientFilter::new().meeting_status(MeetingStatus::Pending);
        assert_eq!(scope_filter(&admin(), requested.clone()), requested);
    }

    #[test]
    fn team_cannot_assign_to_others() {
        let other = UserId::new(9).expect("valid user id");
        assert!(authorize_assignment(&team(2), UserId::new(2).expect("valid user id")).is_ok());
        assert!(matches!(
            authorize_assignment(&team(2), other),
            Err(ServiceError::AccessDenied)
        ));
        assert!(authorize_assignment(&admin(), other).is_ok());
    }

    #[test]
    fn requested_assignment_is_checked_before_validation() {
        assert!(matches!(
            authorize_requested_assignment(&team(2), Some(9)),
            Err(ServiceError::AccessDenied)
        ));
        assert!(authorize_requested_assignment(&team(2), Some(2)).is_ok());
        assert!(authorize_requested_assignment(&team(2), Some(0)).is_ok());
        assert!(authorize_requested_assignment(&team(2), None).is_ok());
        assert!(authorize_requested_assignment(&admin(), Some(9)).is_ok());
    }

    #[test]
    fn only_team_writes_are_pinned_to_assignee() {
        assert_eq!(required_assignee(&team(2)), UserId::new(2).ok());
        assert_eq!(required_assignee(&admin()), None);
    }

    #[test]
    fn team_summary_override_is_stripped() {
        let patch = ClientPatch {
            summary: SummaryOverride {
                meeting_status: Some(MeetingStatus::Visited),
                client_status: Some(ClientStatus::Registered),
            },
            ..ClientPatch::default()
        };

        let team_patch = permitted_patch(&team(2), patch.clone()).expect("patch is allowed");
        assert!(team_patch.summary.is_empty());

        let admin_patch = permitted_patch(&admin(), patch).expect("patch is allowed");
        assert_eq!(admin_patch.summary.client_status, Some(ClientStatus::Registered));
    }

    #[test]
    fn team_reassignment_is_denied() {
        let patch = ClientPatch {
            assigned_to: UserId::new(9).ok(),
            ..ClientPatch::default()
        };
        assert!(matches!(
            permitted_patch(&team(2), patch),
            Err(ServiceError::AccessDenied)
        ));
    }

    #[test]
    fn admin_only_operations() {
        assert!(require_admin(&admin()).is_ok());
        assert!(matches!(require_admin(&team(2)), Err(ServiceError::AccessDenied)));
    }
}
