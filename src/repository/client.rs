use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::client::{Client, ClientPatch, NewClient};
use crate::domain::derivation::recompute_from_ledger;
use crate::domain::types::ClientId;
use crate::domain::visit::VisitEntry;
use crate::models::client::{
    Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient, UpdateSummary,
};
use crate::models::visit_entry::{NewVisitEntry as DbNewVisitEntry, VisitEntry as DbVisitEntry};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ClientFilter, ClientReader, ClientWriter, DieselRepository};
use crate::schema::clients;

/// Base query narrowed by every populated field of `filter`.
fn filtered_clients<'a>(filter: &ClientFilter) -> clients::BoxedQuery<'a, Sqlite> {
    let mut query = clients::table.into_boxed();

    if let Some(user_id) = filter.assigned_to {
        query = query.filter(clients::assigned_to.eq(user_id.get()));
    }
    if let Some(range) = filter.date_range {
        query = query.filter(clients::assigned_visit_date.between(range.start, range.end));
    }
    if let Some(status) = filter.meeting_status {
        query = query.filter(clients::meeting_status.eq(status.as_str()));
    }
    if let Some(status) = filter.client_status {
        query = query.filter(clients::client_status.eq(status.as_str()));
    }

    query
}

/// Attaches the ordered ledger to each loaded client row.
pub(crate) fn with_ledgers(
    conn: &mut SqliteConnection,
    rows: Vec<DbClient>,
) -> RepositoryResult<Vec<Client>> {
    use crate::schema::visit_entries;

    let entries = DbVisitEntry::belonging_to(&rows)
        .select(DbVisitEntry::as_select())
        .order(visit_entries::position.asc())
        .load::<DbVisitEntry>(conn)?
        .grouped_by(&rows);

    rows.into_iter()
        .zip(entries)
        .map(|(row, entries)| -> RepositoryResult<Client> {
            let history = entries
                .into_iter()
                .map(VisitEntry::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(row.into_domain(history)?)
        })
        .collect()
}

pub(crate) fn load_client(
    conn: &mut SqliteConnection,
    id: ClientId,
) -> RepositoryResult<Option<Client>> {
    let row = clients::table
        .find(id.get())
        .select(DbClient::as_select())
        .first::<DbClient>(conn)
        .optional()?;

    match row {
        Some(row) => Ok(with_ledgers(conn, vec![row])?.pop()),
        None => Ok(None),
    }
}

fn reload(conn: &mut SqliteConnection, id: ClientId) -> RepositoryResult<Client> {
    load_client(conn, id)?.ok_or(RepositoryError::NotFound)
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;
        load_client(&mut conn, id)
    }

    fn list_clients(&self, filter: &ClientFilter) -> RepositoryResult<Vec<Client>> {
        let mut conn = self.conn()?;

        let rows = filtered_clients(filter)
            .order((
                clients::assigned_visit_date.desc(),
                clients::created_at.desc(),
                clients::id.desc(),
            ))
            .select(DbClient::as_select())
            .load::<DbClient>(&mut conn)?;

        with_ledgers(&mut conn, rows)
    }

    fn count_clients(&self, filter: &ClientFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let total: i64 = filtered_clients(filter).count().get_result(&mut conn)?;

        Ok(total as usize)
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        use crate::schema::visit_entries;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let seed = new_client.seed_visit();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(clients::table)
                .values(&DbNewClient::from_domain(new_client, now))
                .get_result::<DbClient>(conn)?;

            diesel::insert_into(visit_entries::table)
                .values(&DbNewVisitEntry::from_domain(row.id, 0, &seed)?)
                .execute(conn)?;

            reload(conn, ClientId::new(row.id)?)
        })
    }

    fn update_client(&self, id: ClientId, patch: &ClientPatch) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;
        let updates = DbUpdateClient::from_patch(patch, Utc::now().naive_utc());

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::update(clients::table.find(id.get()))
                .set(&updates)
                .execute(conn)?;
            if affected == 0 {
                return Err(RepositoryError::NotFound);
            }

            reload(conn, id)
        })
    }

    fn delete_client(&self, id: ClientId) -> RepositoryResult<bool> {
        use crate::schema::visit_entries;

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::delete(visit_entries::table.filter(visit_entries::client_id.eq(id.get())))
                .execute(conn)?;
            let deleted = diesel::delete(clients::table.find(id.get())).execute(conn)?;
            Ok(deleted > 0)
        })
    }

    fn recompute_summary(&self, id: ClientId) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let client = reload(conn, id)?;
            let summary = recompute_from_ledger(&client.visit_history).ok_or_else(|| {
                RepositoryError::Unexpected(format!("client {id} has an empty ledger"))
            })?;

            diesel::update(clients::table.find(id.get()))
                .set(&UpdateSummary::new(summary, Utc::now().naive_utc()))
                .execute(conn)?;

            reload(conn, id)
        })
    }
}
