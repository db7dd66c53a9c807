//! Visit ledger entries recorded against a client.

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ContactName, ContactPhone, MediaUrl, MeetingStatus, UserId, VisitEntryId, VisitNote,
};

/// Person met on site whose contact details were collected.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ContactPerson {
    pub name: ContactName,
    pub phone: ContactPhone,
}

impl ContactPerson {
    #[must_use]
    pub fn new(name: ContactName, phone: ContactPhone) -> Self {
        Self { name, phone }
    }
}

/// Persisted ledger element. Never mutated once written.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VisitEntry {
    pub id: VisitEntryId,
    /// Zero-based position in the owning client's ledger.
    pub position: i32,
    pub visit_date: NaiveDateTime,
    pub visited_by: UserId,
    pub status: MeetingStatus,
    pub feedback: Option<VisitNote>,
    pub issues: Option<VisitNote>,
    pub rescheduled_date: Option<NaiveDateTime>,
    pub site_images: Vec<MediaUrl>,
    pub payment_screenshots: Vec<MediaUrl>,
    pub document_images: Vec<MediaUrl>,
    pub contact_persons_collected: Vec<ContactPerson>,
    pub registration_completed: bool,
    pub registration_details: Option<VisitNote>,
    pub created_at: NaiveDateTime,
}

/// Ledger entry waiting to be appended.
#[derive(Clone, Debug, PartialEq)]
pub struct NewVisitEntry {
    pub visit_date: NaiveDateTime,
    pub visited_by: UserId,
    pub status: MeetingStatus,
    pub feedback: Option<VisitNote>,
    pub issues: Option<VisitNote>,
    pub rescheduled_date: Option<NaiveDateTime>,
    pub site_images: Vec<MediaUrl>,
    pub payment_screenshots: Vec<MediaUrl>,
    pub document_images: Vec<MediaUrl>,
    pub contact_persons_collected: Vec<ContactPerson>,
    pub registration_completed: bool,
    pub registration_details: Option<VisitNote>,
    pub created_at: NaiveDateTime,
}

impl NewVisitEntry {
    /// Starts an entry with no notes, media or registration data.
    ///
    /// A `Rescheduled` status needs [`NewVisitEntry::rescheduled_to`] before
    /// the entry can be stored.
    #[must_use]
    pub fn new(visited_by: UserId, status: MeetingStatus, visit_date: NaiveDateTime) -> Self {
        Self {
            visit_date,
            visited_by,
            status,
            feedback: None,
            issues: None,
            rescheduled_date: None,
            site_images: Vec::new(),
            payment_screenshots: Vec::new(),
            document_images: Vec::new(),
            contact_persons_collected: Vec::new(),
            registration_completed: false,
            registration_details: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn rescheduled_to(mut self, date: NaiveDateTime) -> Self {
        self.rescheduled_date = Some(date);
        self
    }

    #[must_use]
    pub fn notes(mut self, feedback: Option<VisitNote>, issues: Option<VisitNote>) -> Self {
        self.feedback = feedback;
        self.issues = issues;
        self
    }

    #[must_use]
    pub fn media(
        mut self,
        site_images: Vec<MediaUrl>,
        payment_screenshots: Vec<MediaUrl>,
        document_images: Vec<MediaUrl>,
    ) -> Self {
        self.site_images = site_images;
        self.payment_screenshots = payment_screenshots;
        self.document_images = document_images;
        self
    }

    /// Stores the collected contacts as a set, keeping first-seen order.
    #[must_use]
    pub fn contacts(mut self, contacts: Vec<ContactPerson>) -> Self {
        let mut unique: Vec<ContactPerson> = Vec::with_capacity(contacts.len());
        for contact in contacts {
            if !unique.contains(&contact) {
                unique.push(contact);
            }
        }
        self.contact_persons_collected = unique;
        self
    }

    /// Registration details are only kept for completed registrations.
    #[must_use]
    pub fn registration(mut self, completed: bool, details: Option<VisitNote>) -> Self {
        self.registration_completed = completed;
        self.registration_details = if completed { details } else { None };
        self
    }

    /// `rescheduled_date` is present iff the status is `Rescheduled`.
    pub fn is_consistent(&self) -> bool {
        (self.status == MeetingStatus::Rescheduled) == self.rescheduled_date.is_some()
    }
}
