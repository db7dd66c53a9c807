use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client::{Client as DomainClient, ClientPatch, NewClient as DomainNewClient};
use crate::domain::derivation::SummaryFields;
use crate::domain::types::{
    ClientAddress, ClientId, ClientName, ClientPhone, ClientStatus, MapLocationUrl, MeetingStatus,
    TypeConstraintError, UserId,
};
use crate::domain::visit::VisitEntry;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub map_location_link: Option<String>,
    pub assigned_to: i32,
    pub assigned_visit_date: NaiveDateTime,
    pub meeting_status: String,
    pub client_status: String,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`].
pub struct NewClient<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub phone: &'a str,
    pub map_location_link: Option<&'a str>,
    pub assigned_to: i32,
    pub assigned_visit_date: NaiveDateTime,
    pub meeting_status: &'static str,
    pub client_status: &'static str,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Data used when updating a [`Client`] record. `None` fields are skipped.
pub struct UpdateClient<'a> {
    pub name: Option<&'a str>,
    pub address: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub map_location_link: Option<Option<&'a str>>,
    pub assigned_to: Option<i32>,
    pub assigned_visit_date: Option<NaiveDateTime>,
    pub meeting_status: Option<&'static str>,
    pub client_status: Option<&'static str>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Summary columns rewritten after a ledger append or recompute.
pub struct UpdateSummary {
    pub meeting_status: &'static str,
    pub client_status: &'static str,
    pub assigned_visit_date: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Client {
    /// Builds the domain aggregate from the row and its already loaded ledger.
    pub fn into_domain(
        self,
        visit_history: Vec<VisitEntry>,
    ) -> Result<DomainClient, TypeConstraintError> {
        Ok(DomainClient {
            id: ClientId::new(self.id)?,
            name: ClientName::new(self.name)?,
            address: ClientAddress::new(self.address)?,
            phone: ClientPhone::new(self.phone)?,
            map_location_link: self.map_location_link.map(MapLocationUrl::new).transpose()?,
            assigned_to: UserId::new(self.assigned_to)?,
            assigned_visit_date: self.assigned_visit_date,
            meeting_status: self.meeting_status.parse()?,
            client_status: self.client_status.parse()?,
            visit_history,
            created_by: UserId::new(self.created_by)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    /// Summary columns as stored, without touching the ledger.
    pub fn summary(&self) -> Result<SummaryFields, TypeConstraintError> {
        Ok(SummaryFields {
            meeting_status: self.meeting_status.parse()?,
            client_status: self.client_status.parse()?,
            assigned_visit_date: self.assigned_visit_date,
        })
    }
}

impl<'a> NewClient<'a> {
    /// Insertable row for a freshly created client with the initial summary.
    pub fn from_domain(client: &'a DomainNewClient, now: NaiveDateTime) -> Self {
        Self {
            name: client.name.as_str(),
            address: client.address.as_str(),
            phone: client.phone.as_str(),
            map_location_link: client.map_location_link.as_ref().map(MapLocationUrl::as_str),
            assigned_to: client.assigned_to.get(),
            assigned_visit_date: client.assigned_visit_date,
            meeting_status: MeetingStatus::Pending.as_str(),
            client_status: ClientStatus::NotRegistered.as_str(),
            created_by: client.created_by.get(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateClient<'a> {
    pub fn from_patch(patch: &'a ClientPatch, now: NaiveDateTime) -> Self {
        Self {
            name: patch.name.as_ref().map(ClientName::as_str),
            address: patch.address.as_ref().map(ClientAddress::as_str),
            phone: patch.phone.as_ref().map(ClientPhone::as_str),
            map_location_link: patch
                .map_location_link
                .as_ref()
                .map(|link| link.as_ref().map(MapLocationUrl::as_str)),
            assigned_to: patch.assigned_to.map(UserId::get),
            assigned_visit_date: patch.assigned_visit_date,
            meeting_status: patch.summary.meeting_status.map(|s| s.as_str()),
            client_status: patch.summary.client_status.map(|s| s.as_str()),
            updated_at: now,
        }
    }
}

impl UpdateSummary {
    pub fn new(summary: SummaryFields, now: NaiveDateTime) -> Self {
        Self {
            meeting_status: summary.meeting_status.as_str(),
            client_status: summary.client_status.as_str(),
            assigned_visit_date: summary.assigned_visit_date,
            updated_at: now,
        }
    }
}
