use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ClientAddress, ClientId, ClientName, ClientPhone, ClientStatus, MapLocationUrl,
    MeetingStatus, UserId,
};
use crate::domain::visit::{NewVisitEntry, VisitEntry};

/// Root aggregate: a client together with its visit ledger.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: ClientName,
    pub address: ClientAddress,
    pub phone: ClientPhone,
    pub map_location_link: Option<MapLocationUrl>,
    pub assigned_to: UserId,
    pub assigned_visit_date: NaiveDateTime,
    pub meeting_status: MeetingStatus,
    pub client_status: ClientStatus,
    /// Ledger in append order. Never empty for a stored client.
    pub visit_history: Vec<VisitEntry>,
    pub created_by: UserId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Client {
    /// Most recently appended ledger entry.
    pub fn latest_visit(&self) -> Option<&VisitEntry> {
        self.visit_history.last()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewClient {
    pub name: ClientName,
    pub address: ClientAddress,
    pub phone: ClientPhone,
    pub map_location_link: Option<MapLocationUrl>,
    pub assigned_to: UserId,
    pub assigned_visit_date: NaiveDateTime,
    pub created_by: UserId,
}

impl NewClient {
    #[must_use]
    pub fn new(
        name: ClientName,
        address: ClientAddress,
        phone: ClientPhone,
        map_location_link: Option<MapLocationUrl>,
        assigned_to: UserId,
        assigned_visit_date: NaiveDateTime,
        created_by: UserId,
    ) -> Self {
        Self {
            name,
            address,
            phone,
            map_location_link,
            assigned_to,
            assigned_visit_date,
            created_by,
        }
    }

    /// Pending entry every new client starts its ledger with.
    #[must_use]
    pub fn seed_visit(&self) -> NewVisitEntry {
        NewVisitEntry::new(
            self.assigned_to,
            MeetingStatus::Pending,
            self.assigned_visit_date,
        )
    }
}

/// Explicit admin override of the ledger-derived summary fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SummaryOverride {
    pub meeting_status: Option<MeetingStatus>,
    pub client_status: Option<ClientStatus>,
}

impl SummaryOverride {
    pub fn is_empty(&self) -> bool {
        self.meeting_status.is_none() && self.client_status.is_none()
    }
}

/// Partial update of a client. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientPatch {
    pub name: Option<ClientName>,
    pub address: Option<ClientAddress>,
    pub phone: Option<ClientPhone>,
    /// `Some(None)` clears the stored link.
    pub map_location_link: Option<Option<MapLocationUrl>>,
    pub assigned_to: Option<UserId>,
    pub assigned_visit_date: Option<NaiveDateTime>,
    pub summary: SummaryOverride,
}

impl ClientPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.map_location_link.is_none()
            && self.assigned_to.is_none()
            && self.assigned_visit_date.is_none()
            && self.summary.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn seed_visit_is_pending_at_assigned_date() {
        let visit_date = NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date");
        let assignee = UserId::new(5).expect("valid user id");
        let new_client = NewClient::new(
            ClientName::new("Acme").expect("valid name"),
            ClientAddress::new("1 Main St").expect("valid address"),
            ClientPhone::new("555-0100").expect("valid phone"),
            None,
            assignee,
            visit_date,
            UserId::new(1).expect("valid user id"),
        );

        let seed = new_client.seed_visit();

        assert_eq!(seed.status, MeetingStatus::Pending);
        assert_eq!(seed.visit_date, visit_date);
        assert_eq!(seed.visited_by, assignee);
        assert!(seed.is_consistent());
    }

    #[test]
    fn empty_patch_detection() {
        assert!(ClientPatch::default().is_empty());
        let patch = ClientPatch {
            summary: SummaryOverride {
                meeting_status: Some(MeetingStatus::Visited),
                client_status: None,
            },
            ..ClientPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
