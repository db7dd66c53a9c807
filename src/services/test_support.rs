//! Builders shared by the service unit tests.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::actor::Actor;
use crate::domain::client::Client;
use crate::domain::team_member::TeamMember;
use crate::domain::types::{
    ClientAddress, ClientId, ClientName, ClientPhone, ClientStatus, MeetingStatus, MemberName,
    Role, UserEmail, UserId, VisitEntryId,
};
use crate::domain::visit::VisitEntry;

pub fn user(id: i32) -> UserId {
    UserId::new(id).expect("valid user id")
}

pub fn admin() -> Actor {
    Actor::new(user(1), Role::Admin)
}

pub fn team(id: i32) -> Actor {
    Actor::new(user(id), Role::Team)
}

pub fn day(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

pub fn member(id: i32, role: Role) -> TeamMember {
    TeamMember {
        id: user(id),
        name: MemberName::new(format!("Member {id}")).expect("valid name"),
        email: UserEmail::new(format!("member{id}@example.com")).expect("valid email"),
        role,
        created_at: day(1),
        updated_at: day(1),
    }
}

/// Stored client with only its seed entry, assigned to `assigned_to`.
pub fn client(id: i32, assigned_to: i32) -> Client {
    Client {
        id: ClientId::new(id).expect("valid client id"),
        name: ClientName::new(format!("Client {id}")).expect("valid name"),
        address: ClientAddress::new("1 Main St").expect("valid address"),
        phone: ClientPhone::new("555-0100").expect("valid phone"),
        map_location_link: None,
        assigned_to: user(assigned_to),
        assigned_visit_date: day(1),
        meeting_status: MeetingStatus::Pending,
        client_status: ClientStatus::NotRegistered,
        visit_history: vec![VisitEntry {
            id: VisitEntryId::new(id).expect("valid entry id"),
            position: 0,
            visit_date: day(1),
            visited_by: user(assigned_to),
            status: MeetingStatus::Pending,
            feedback: None,
            issues: None,
            rescheduled_date: None,
            site_images: Vec::new(),
            payment_screenshots: Vec::new(),
            document_images: Vec::new(),
            contact_persons_collected: Vec::new(),
            registration_completed: false,
            registration_details: None,
            created_at: day(1),
        }],
        created_by: user(1),
        created_at: day(1),
        updated_at: day(1),
    }
}
