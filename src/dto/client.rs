//! DTOs shaped for client list and detail responses.

use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::client::Client;
use crate::domain::team_member::TeamMember;
use crate::domain::types::{ClientStatus, MediaUrl, MeetingStatus, UserId};
use crate::domain::visit::{ContactPerson, VisitEntry};
use crate::repository::ClientFilter;

/// A user reference resolved against the roster.
///
/// `name` and `email` are `None` when the member no longer exists.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i32,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserSummary {
    pub fn resolve(id: UserId, users: &HashMap<UserId, TeamMember>) -> Self {
        let member = users.get(&id);
        Self {
            id: id.get(),
            name: member.map(|m| m.name.as_str().to_string()),
            email: member.map(|m| m.email.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitEntryView {
    pub id: i32,
    pub visit_date: NaiveDateTime,
    pub visited_by: UserSummary,
    pub status: MeetingStatus,
    pub feedback: Option<String>,
    pub issues: Option<String>,
    pub rescheduled_date: Option<NaiveDateTime>,
    pub site_images: Vec<String>,
    pub payment_screenshots: Vec<String>,
    pub document_images: Vec<String>,
    pub contact_persons_collected: Vec<ContactPerson>,
    pub registration_completed: bool,
    pub registration_details: Option<String>,
    pub created_at: NaiveDateTime,
}

impl VisitEntryView {
    fn new(entry: VisitEntry, users: &HashMap<UserId, TeamMember>) -> Self {
        let urls = |list: Vec<MediaUrl>| -> Vec<String> {
            list.into_iter().map(String::from).collect()
        };
        Self {
            id: entry.id.get(),
            visit_date: entry.visit_date,
            visited_by: UserSummary::resolve(entry.visited_by, users),
            status: entry.status,
            feedback: entry.feedback.map(String::from),
            issues: entry.issues.map(String::from),
            rescheduled_date: entry.rescheduled_date,
            site_images: urls(entry.site_images),
            payment_screenshots: urls(entry.payment_screenshots),
            document_images: urls(entry.document_images),
            contact_persons_collected: entry.contact_persons_collected,
            registration_completed: entry.registration_completed,
            registration_details: entry.registration_details.map(String::from),
            created_at: entry.created_at,
        }
    }
}

/// Client as rendered by the API, with user references resolved.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub map_location_link: Option<String>,
    pub assigned_to: UserSummary,
    pub assigned_visit_date: NaiveDateTime,
    pub meeting_status: MeetingStatus,
    pub client_status: ClientStatus,
    pub visit_history: Vec<VisitEntryView>,
    pub created_by: UserSummary,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ClientView {
    pub fn new(client: Client, users: &HashMap<UserId, TeamMember>) -> Self {
        Self {
            id: client.id.get(),
            name: client.name.into_inner(),
            address: client.address.into_inner(),
            phone: client.phone.into_inner(),
            map_location_link: client.map_location_link.map(String::from),
            assigned_to: UserSummary::resolve(client.assigned_to, users),
            assigned_visit_date: client.assigned_visit_date,
            meeting_status: client.meeting_status,
            client_status: client.client_status,
            visit_history: client
                .visit_history
                .into_iter()
                .map(|entry| VisitEntryView::new(entry, users))
                .collect(),
            created_by: UserSummary::resolve(client.created_by, users),
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

/// Every user id a set of clients refers to, without duplicates.
pub fn referenced_users(clients: &[Client]) -> Vec<UserId> {
    let mut ids = BTreeSet::new();
    for client in clients {
        ids.insert(client.assigned_to);
        ids.insert(client.created_by);
        ids.extend(client.visit_history.iter().map(|entry| entry.visited_by));
    }
    ids.into_iter().collect()
}

/// Query string of the client list endpoint.
///
/// Values that do not parse are ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientsQuery {
    /// `YYYY-MM-DD`, matched against the assigned visit date.
    pub date: Option<String>,
    /// Meeting status.
    pub status: Option<String>,
    pub client_status: Option<String>,
    pub assigned_to: Option<String>,
}

impl ClientsQuery {
    pub fn into_filter(self) -> ClientFilter {
        let mut filter = ClientFilter::new();

        if let Some(day) = parse_day(self.date.as_deref()) {
            filter = filter.on_day(day);
        }
        if let Some(status) = self.status.and_then(|s| s.parse::<MeetingStatus>().ok()) {
            filter = filter.meeting_status(status);
        }
        if let Some(status) = self
            .client_status
            .and_then(|s| s.parse::<ClientStatus>().ok())
        {
            filter = filter.client_status(status);
        }
        if let Some(user_id) = self.assigned_to.and_then(|s| s.parse::<UserId>().ok()) {
            filter = filter.assigned_to(user_id);
        }

        filter
    }
}

/// Parses a `YYYY-MM-DD` query value.
pub fn parse_day(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
}

/// Body of `GET /api/clients`.
#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    pub clients: Vec<ClientView>,
}

/// Body returned for a single client, with a message after mutations.
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub client: ClientView,
}

/// Body carrying only a confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
