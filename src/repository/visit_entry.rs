//! Ledger appends.
//!
//! Appending runs under `BEGIN IMMEDIATE`, so the position read, the insert
//! and the summary rewrite hold SQLite's writer lock together. The
//! `UNIQUE(client_id, position)` index backs this up against any writer that
//! bypasses the transaction. The assignee check for field agents is repeated
//! inside the same transaction.

use chrono::Utc;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::client::Client;
use crate::domain::derivation::derive;
use crate::domain::types::{ClientId, UserId};
use crate::domain::visit::{NewVisitEntry, VisitEntry};
use crate::models::client::{Client as DbClient, UpdateSummary};
use crate::models::visit_entry::{NewVisitEntry as DbNewVisitEntry, VisitEntry as DbVisitEntry};
use crate::repository::client::load_client;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, VisitLedgerWriter};

fn ledger_conflict(err: DieselError) -> RepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            RepositoryError::Conflict(format!("ledger position taken: {}", info.message()))
        }
        other => RepositoryError::from(other),
    }
}

impl VisitLedgerWriter for DieselRepository {
    fn append_visit(
        &self,
        id: ClientId,
        assignee: Option<UserId>,
        entry: &NewVisitEntry,
    ) -> RepositoryResult<Client> {
        use crate::schema::{clients, visit_entries};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let row = clients::table
                .find(id.get())
                .select(DbClient::as_select())
                .first::<DbClient>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;
            if assignee.is_some_and(|user| user.get() != row.assigned_to) {
                return Err(RepositoryError::NotAssigned);
            }

            let last_position: Option<i32> = visit_entries::table
                .filter(visit_entries::client_id.eq(id.get()))
                .select(max(visit_entries::position))
                .get_result(conn)?;
            let position = last_position.map_or(0, |p| p + 1);

            let inserted = diesel::insert_into(visit_entries::table)
                .values(&DbNewVisitEntry::from_domain(id.get(), position, entry)?)
                .get_result::<DbVisitEntry>(conn)
                .map_err(ledger_conflict)?;
            let latest = VisitEntry::try_from(inserted)?;

            let summary = derive(&latest, row.summary()?);
            diesel::update(clients::table.find(id.get()))
                .set(&UpdateSummary::new(summary, Utc::now().naive_utc()))
                .execute(conn)?;

            load_client(conn, id)?.ok_or(RepositoryError::NotFound)
        })
    }
}
