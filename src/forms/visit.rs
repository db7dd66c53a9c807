//! Body of a "record visit" request.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::domain::types::{ContactName, ContactPhone, MediaUrl, MeetingStatus, UserId, VisitNote};
use crate::domain::visit::{ContactPerson, NewVisitEntry};
use crate::forms::{FieldErrors, FormError, non_blank, parse_timestamp};

#[derive(Debug, Default, Deserialize)]
pub struct ContactPersonForm {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordVisitForm {
    /// Defaults to `visited`.
    pub status: Option<String>,
    /// Defaults to the time the visit is recorded.
    pub visit_date: Option<String>,
    pub feedback: Option<String>,
    pub issues: Option<String>,
    /// Required when, and only when, `status` is `rescheduled`.
    pub rescheduled_date: Option<String>,
    #[serde(default)]
    pub site_images: Vec<String>,
    #[serde(default)]
    pub payment_screenshots: Vec<String>,
    #[serde(default)]
    pub document_images: Vec<String>,
    #[serde(default)]
    pub contact_persons_collected: Vec<ContactPersonForm>,
    #[serde(default)]
    pub registration_completed: bool,
    pub registration_details: Option<String>,
}

#[derive(Debug)]
pub struct RecordVisitPayload {
    pub status: MeetingStatus,
    pub visit_date: Option<NaiveDateTime>,
    pub feedback: Option<VisitNote>,
    pub issues: Option<VisitNote>,
    pub rescheduled_date: Option<NaiveDateTime>,
    pub site_images: Vec<MediaUrl>,
    pub payment_screenshots: Vec<MediaUrl>,
    pub document_images: Vec<MediaUrl>,
    pub contact_persons: Vec<ContactPerson>,
    pub registration_completed: bool,
    pub registration_details: Option<VisitNote>,
}

fn media_urls(errors: &mut FieldErrors, field: &str, urls: Vec<String>) -> Vec<MediaUrl> {
    urls.into_iter()
        .filter_map(|url| errors.check(field, MediaUrl::new(url)))
        .collect()
}

impl TryFrom<RecordVisitForm> for RecordVisitPayload {
    type Error = FormError;

    fn try_from(form: RecordVisitForm) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::default();

        let status = non_blank(form.status)
            .map(|s| errors.check("status", s.parse::<MeetingStatus>()))
            .unwrap_or(Some(MeetingStatus::Visited));
        let visit_date = non_blank(form.visit_date)
            .and_then(|d| errors.check("visitDate", parse_timestamp(&d).ok_or(())));
        let rescheduled_date = non_blank(form.rescheduled_date)
            .and_then(|d| errors.check("rescheduledDate", parse_timestamp(&d).ok_or(())));

        match status {
            Some(MeetingStatus::Rescheduled) if rescheduled_date.is_none() => {
                errors.push("rescheduledDate")
            }
            Some(status) if status != MeetingStatus::Rescheduled && rescheduled_date.is_some() => {
                errors.push("rescheduledDate")
            }
            _ => {}
        }

        let site_images = media_urls(&mut errors, "siteImages", form.site_images);
        let payment_screenshots =
            media_urls(&mut errors, "paymentScreenshots", form.payment_screenshots);
        let document_images = media_urls(&mut errors, "documentImages", form.document_images);

        let contact_persons = form
            .contact_persons_collected
            .into_iter()
            .filter_map(|contact| {
                let name = contact.name.map(ContactName::new);
                let phone = contact.phone.map(ContactPhone::new);
                match (name, phone) {
                    (Some(Ok(name)), Some(Ok(phone))) => Some(ContactPerson::new(name, phone)),
                    _ => {
                        errors.push("contactPersonsCollected");
                        None
                    }
                }
            })
            .collect();

        errors.finish()?;

        let status = status.ok_or_else(|| FormError::InvalidFields(vec!["status".to_string()]))?;

        Ok(Self {
            status,
            visit_date,
            feedback: VisitNote::optional(form.feedback),
            issues: VisitNote::optional(form.issues),
            rescheduled_date,
            site_images,
            payment_screenshots,
            document_images,
            contact_persons,
            registration_completed: form.registration_completed,
            registration_details: VisitNote::optional(form.registration_details),
        })
    }
}

impl RecordVisitPayload {
    /// Ledger entry recorded by `visited_by`, dated `now` unless a visit date was given.
    pub fn into_domain(self, visited_by: UserId, now: NaiveDateTime) -> NewVisitEntry {
        let mut entry = NewVisitEntry::new(visited_by, self.status, self.visit_date.unwrap_or(now))
            .notes(self.feedback, self.issues)
            .media(
                self.site_images,
                self.payment_screenshots,
                self.document_images,
            )
            .contacts(self.contact_persons)
            .registration(self.registration_completed, self.registration_details);

        if let Some(date) = self.rescheduled_date {
            entry = entry.rescheduled_to(date);
        }

        entry
    }
}
