//! Derivation of a client's summary fields from its visit ledger.
//!
//! Pure functions only: the repository calls [`derive`] inside the same
//! transaction that appends the entry, and [`recompute_from_ledger`] when an
//! administrator asks to resynchronise an overridden summary.

use chrono::NaiveDateTime;

use crate::domain::client::Client;
use crate::domain::types::{ClientStatus, MeetingStatus};
use crate::domain::visit::VisitEntry;

/// Denormalized, ledger-derived state stored on a client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryFields {
    pub meeting_status: MeetingStatus,
    pub client_status: ClientStatus,
    pub assigned_visit_date: NaiveDateTime,
}

impl SummaryFields {
    /// Current summary of a stored client.
    pub fn of(client: &Client) -> Self {
        Self {
            meeting_status: client.meeting_status,
            client_status: client.client_status,
            assigned_visit_date: client.assigned_visit_date,
        }
    }
}

/// Summary after appending `latest` to a ledger whose summary was `current`.
///
/// The newest entry's status always wins, a reschedule date moves the
/// assigned visit date, and registration only ever moves forward.
pub fn derive(latest: &VisitEntry, current: SummaryFields) -> SummaryFields {
    let client_status = if latest.registration_completed {
        ClientStatus::Registered
    } else {
        current.client_status
    };

    SummaryFields {
        meeting_status: latest.status,
        client_status,
        assigned_visit_date: latest
            .rescheduled_date
            .unwrap_or(current.assigned_visit_date),
    }
}

/// Replays the whole ledger from its seed entry. `None` for an empty ledger.
pub fn recompute_from_ledger(history: &[VisitEntry]) -> Option<SummaryFields> {
    let seed = history.first()?;
    let initial = SummaryFields {
        meeting_status: MeetingStatus::Pending,
        client_status: ClientStatus::NotRegistered,
        assigned_visit_date: seed.visit_date,
    };

    Some(history.iter().fold(initial, |summary, entry| derive(entry, summary)))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::domain::types::{UserId, VisitEntryId};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date")
    }

    fn entry(position: i32, status: MeetingStatus) -> VisitEntry {
        VisitEntry {
            id: VisitEntryId::new(position + 1).expect("valid entry id"),
            position,
            visit_date: at(1),
            visited_by: UserId::new(2).expect("valid user id"),
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

    fn pending_summary() -> SummaryFields {
        SummaryFields {
            meeting_status: MeetingStatus::Pending,
            client_status: ClientStatus::NotRegistered,
            assigned_visit_date: at(1),
        }
    }

    #[test]
    fn newest_status_always_wins() {
        let current = SummaryFields {
            meeting_status: MeetingStatus::Visited,
            ..pending_summary()
        };
        let next = derive(&entry(1, MeetingStatus::Pending), current);
        assert_eq!(next.meeting_status, MeetingStatus::Pending);
    }

    #[test]
    fn reschedule_moves_assigned_date() {
        let mut latest = entry(1, MeetingStatus::Rescheduled);
        latest.rescheduled_date = Some(at(10));

        let next = derive(&latest, pending_summary());

        assert_eq!(next.meeting_status, MeetingStatus::Rescheduled);
        assert_eq!(next.assigned_visit_date, at(10));
    }

    #[test]
    fn missing_reschedule_keeps_assigned_date() {
        let next = derive(&entry(1, MeetingStatus::Visited), pending_summary());
        assert_eq!(next.assigned_visit_date, at(1));
    }

    #[test]
    fn registration_is_monotonic() {
        let mut registering = entry(1, MeetingStatus::Visited);
        registering.registration_completed = true;
        let registered = derive(&registering, pending_summary());
        assert_eq!(registered.client_status, ClientStatus::Registered);

        let later = derive(&entry(2, MeetingStatus::Visited), registered);
        assert_eq!(later.client_status, ClientStatus::Registered);
    }

    #[test]
    fn recompute_replays_every_entry() {
        let mut registering = entry(1, MeetingStatus::Visited);
        registering.registration_completed = true;
        let mut rescheduling = entry(2, MeetingStatus::Rescheduled);
        rescheduling.rescheduled_date = Some(at(20));
        let ledger = vec![entry(0, MeetingStatus::Pending), registering, rescheduling];

        let summary = recompute_from_ledger(&ledger).expect("non-empty ledger");

        assert_eq!(summary.meeting_status, MeetingStatus::Rescheduled);
        assert_eq!(summary.client_status, ClientStatus::Registered);
        assert_eq!(summary.assigned_visit_date, at(20));
    }

    #[test]
    fn recompute_of_empty_ledger_is_none() {
        assert_eq!(recompute_from_ledger(&[]), None);
    }
}
