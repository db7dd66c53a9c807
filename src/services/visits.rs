//! Recording visits in a client's ledger.

use chrono::Utc;

use crate::domain::actor::Actor;
use crate::dto::client::ClientView;
use crate::forms::visit::{RecordVisitForm, RecordVisitPayload};
use crate::repository::{ClientReader, TeamMemberReader, VisitLedgerWriter};
use crate::services::ServiceResult;
use crate::services::clients::{load_authorized, present_client};
use crate::services::scope::required_assignee;

/// Appends a visit by the actor and returns the client with its new summary.
pub fn record_visit<R>(
    repo: &R,
    actor: &Actor,
    id: i32,
    form: RecordVisitForm,
) -> ServiceResult<ClientView>
where
    R: ClientReader + VisitLedgerWriter + TeamMemberReader + ?Sized,
{
    let client = load_authorized(repo, actor, id)?;
    let payload = RecordVisitPayload::try_from(form)?;
    let entry = payload.into_domain(actor.user_id, Utc::now().naive_utc());

    let updated = repo
        .append_visit(client.id, required_assignee(actor), &entry)
        .map_err(|err| {
        log::error!("Failed to record visit for client {}: {err}", client.id);
        err
    })?;

    log::info!(
        "Visit recorded for client {} by user {}: {}",
        updated.id,
        actor.user_id,
        entry.status
    );

    present_client(repo, updated)
}
