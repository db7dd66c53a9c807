//! Diesel models for visit ledger rows.
//!
//! Media URL lists and collected contacts are stored as JSON text columns.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::types::{TypeConstraintError, UserId, VisitEntryId, VisitNote};
use crate::domain::visit::{NewVisitEntry as DomainNewVisitEntry, VisitEntry as DomainVisitEntry};
use crate::models::client::Client;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Client, foreign_key = client_id))]
#[diesel(table_name = crate::schema::visit_entries)]
pub struct VisitEntry {
    pub id: i32,
    pub client_id: i32,
    pub position: i32,
    pub visit_date: NaiveDateTime,
    pub visited_by: i32,
    pub status: String,
    pub feedback: Option<String>,
    pub issues: Option<String>,
    pub rescheduled_date: Option<NaiveDateTime>,
    pub site_images: String,
    pub payment_screenshots: String,
    pub document_images: String,
    pub contact_persons_collected: String,
    pub registration_completed: bool,
    pub registration_details: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::visit_entries)]
pub struct NewVisitEntry<'a> {
    pub client_id: i32,
    pub position: i32,
    pub visit_date: NaiveDateTime,
    pub visited_by: i32,
    pub status: &'static str,
    pub feedback: Option<&'a str>,
    pub issues: Option<&'a str>,
    pub rescheduled_date: Option<NaiveDateTime>,
    pub site_images: String,
    pub payment_screenshots: String,
    pub document_images: String,
    pub contact_persons_collected: String,
    pub registration_completed: bool,
    pub registration_details: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, TypeConstraintError> {
    serde_json::to_string(value).map_err(|e| TypeConstraintError::InvalidValue(e.to_string()))
}

fn from_json<T: DeserializeOwned>(text: &str) -> Result<T, TypeConstraintError> {
    serde_json::from_str(text).map_err(|e| TypeConstraintError::InvalidValue(e.to_string()))
}

impl TryFrom<VisitEntry> for DomainVisitEntry {
    type Error = TypeConstraintError;

    fn try_from(entry: VisitEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: VisitEntryId::new(entry.id)?,
            position: entry.position,
            visit_date: entry.visit_date,
            visited_by: UserId::new(entry.visited_by)?,
            status: entry.status.parse()?,
            feedback: entry.feedback.map(VisitNote::new).transpose()?,
            issues: entry.issues.map(VisitNote::new).transpose()?,
            rescheduled_date: entry.rescheduled_date,
            site_images: from_json(&entry.site_images)?,
            payment_screenshots: from_json(&entry.payment_screenshots)?,
            document_images: from_json(&entry.document_images)?,
            contact_persons_collected: from_json(&entry.contact_persons_collected)?,
            registration_completed: entry.registration_completed,
            registration_details: entry.registration_details.map(VisitNote::new).transpose()?,
            created_at: entry.created_at,
        })
    }
}

impl<'a> NewVisitEntry<'a> {
    /// Insertable row placing `entry` at `position` in the client's ledger.
    pub fn from_domain(
        client_id: i32,
        position: i32,
        entry: &'a DomainNewVisitEntry,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            client_id,
            position,
            visit_date: entry.visit_date,
            visited_by: entry.visited_by.get(),
            status: entry.status.as_str(),
            feedback: entry.feedback.as_ref().map(VisitNote::as_str),
            issues: entry.issues.as_ref().map(VisitNote::as_str),
            rescheduled_date: entry.rescheduled_date,
            site_images: to_json(&entry.site_images)?,
            payment_screenshots: to_json(&entry.payment_screenshots)?,
            document_images: to_json(&entry.document_images)?,
            contact_persons_collected: to_json(&entry.contact_persons_collected)?,
            registration_completed: entry.registration_completed,
            registration_details: entry.registration_details.as_ref().map(VisitNote::as_str),
            created_at: entry.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::{ContactName, ContactPhone, MediaUrl, MeetingStatus};
    use crate::domain::visit::ContactPerson;

    #[test]
    fn domain_entry_serializes_lists_as_json() {
        let now = Utc::now().naive_utc();
        let user = UserId::new(2).expect("valid user id");
        let entry = DomainNewVisitEntry::new(user, MeetingStatus::Visited, now)
            .media(
                vec![MediaUrl::new("/uploads/site_image/a.png").expect("valid url")],
                Vec::new(),
                Vec::new(),
            )
            .contacts(vec![ContactPerson::new(
                ContactName::new("Ann").expect("valid name"),
                ContactPhone::new("123").expect("valid phone"),
            )]);

        let row = NewVisitEntry::from_domain(7, 1, &entry).expect("serializable entry");

        assert_eq!(row.client_id, 7);
        assert_eq!(row.position, 1);
        assert_eq!(row.status, "visited");
        assert_eq!(row.site_images, r#"["/uploads/site_image/a.png"]"#);
        assert_eq!(row.payment_screenshots, "[]");
        assert_eq!(
            row.contact_persons_collected,
            r#"[{"name":"Ann","phone":"123"}]"#
        );
    }

    #[test]
    fn db_entry_into_domain() {
        let now = Utc::now().naive_utc();
        let row = VisitEntry {
            id: 9,
            client_id: 7,
            position: 2,
            visit_date: now,
            visited_by: 2,
            status: "rescheduled".to_string(),
            feedback: Some("Owner away".to_string()),
            issues: None,
            rescheduled_date: Some(now),
            site_images: "[]".to_string(),
            payment_screenshots: r#"["https://cdn.example.com/p.png"]"#.to_string(),
            document_images: "[]".to_string(),
            contact_persons_collected: "[]".to_string(),
            registration_completed: false,
            registration_details: None,
            created_at: now,
        };

        let entry = DomainVisitEntry::try_from(row).expect("valid entry");

        assert_eq!(entry.id.get(), 9);
        assert_eq!(entry.status, MeetingStatus::Rescheduled);
        assert_eq!(entry.payment_screenshots.len(), 1);
        assert_eq!(
            entry.feedback.as_ref().map(VisitNote::as_str),
            Some("Owner away")
        );
    }

    #[test]
    fn malformed_json_is_rejected() {
        let now = Utc::now().naive_utc();
        let row = VisitEntry {
            id: 1,
            client_id: 1,
            position: 0,
            visit_date: now,
            visited_by: 1,
            status: "pending".to_string(),
            feedback: None,
            issues: None,
            rescheduled_date: None,
            site_images: "not json".to_string(),
            payment_screenshots: "[]".to_string(),
            document_images: "[]".to_string(),
            contact_persons_collected: "[]".to_string(),
            registration_completed: false,
            registration_details: None,
            created_at: now,
        };

        assert!(matches!(
            DomainVisitEntry::try_from(row),
            Err(TypeConstraintError::InvalidValue(_))
        ));
    }
}
