use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::client::{ClientPatch, NewClient, SummaryOverride};
use crate::domain::types::{
    ClientAddress, ClientName, ClientPhone, ClientStatus, MapLocationUrl, MeetingStatus, UserId,
};
use crate::forms::{FieldErrors, FormError, non_blank, parse_timestamp};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Body of a client creation request.
pub struct CreateClientForm {
    #[validate(length(max = 200))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub map_location_link: Option<String>,
    /// Roster member responsible for the visits.
    pub assigned_to: Option<i32>,
    /// First scheduled visit, see [`parse_timestamp`].
    pub assigned_visit_date: Option<String>,
}

/// Validated creation request.
#[derive(Debug)]
pub struct CreateClientPayload {
    pub name: ClientName,
    pub address: ClientAddress,
    pub phone: ClientPhone,
    pub map_location_link: Option<MapLocationUrl>,
    pub assigned_to: UserId,
    pub assigned_visit_date: NaiveDateTime,
}

impl TryFrom<CreateClientForm> for CreateClientPayload {
    type Error = FormError;

    fn try_from(form: CreateClientForm) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::from_validation(form.validate());

        let name = errors.require("name", non_blank(form.name).map(ClientName::new));
        let address = errors.require("address", non_blank(form.address).map(ClientAddress::new));
        let phone = errors.require("phone", non_blank(form.phone).map(ClientPhone::new));
        let map_location_link = non_blank(form.map_location_link)
            .and_then(|link| errors.check("mapLocationLink", MapLocationUrl::new(link)));
        let assigned_to = errors.require("assignedTo", form.assigned_to.map(UserId::new));
        let assigned_visit_date = errors.require(
            "assignedVisitDate",
            non_blank(form.assigned_visit_date).map(|d| parse_timestamp(&d).ok_or(())),
        );

        errors.finish()?;

        match (name, address, phone, assigned_to, assigned_visit_date) {
            (Some(name), Some(address), Some(phone), Some(assigned_to), Some(assigned_visit_date)) => {
                Ok(Self {
                    name,
                    address,
                    phone,
                    map_location_link,
                    assigned_to,
                    assigned_visit_date,
                })
            }
            _ => Err(FormError::InvalidFields(vec!["body".to_string()])),
        }
    }
}

impl CreateClientPayload {
    pub fn into_domain(self, created_by: UserId) -> NewClient {
        NewClient::new(
            self.name,
            self.address,
            self.phone,
            self.map_location_link,
            self.assigned_to,
            self.assigned_visit_date,
            created_by,
        )
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Body of a client update request. Absent and blank fields are left as is.
pub struct UpdateClientForm {
    #[validate(length(max = 200))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// An empty string clears the stored link.
    pub map_location_link: Option<String>,
    pub assigned_to: Option<i32>,
    pub assigned_visit_date: Option<String>,
    pub meeting_status: Option<String>,
    pub client_status: Option<String>,
}

impl TryFrom<UpdateClientForm> for ClientPatch {
    type Error = FormError;

    fn try_from(form: UpdateClientForm) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::from_validation(form.validate());

        let name = non_blank(form.name).and_then(|v| errors.check("name", ClientName::new(v)));
        let address =
            non_blank(form.address).and_then(|v| errors.check("address", ClientAddress::new(v)));
        let phone = non_blank(form.phone).and_then(|v| errors.check("phone", ClientPhone::new(v)));
        let map_location_link = match form.map_location_link {
            None => None,
            Some(link) if link.trim().is_empty() => Some(None),
            Some(link) => errors
                .check("mapLocationLink", MapLocationUrl::new(link))
                .map(Some),
        };
        let assigned_to = form
            .assigned_to
            .and_then(|id| errors.check("assignedTo", UserId::new(id)));
        let assigned_visit_date = non_blank(form.assigned_visit_date)
            .and_then(|d| errors.check("assignedVisitDate", parse_timestamp(&d).ok_or(())));
        let meeting_status = non_blank(form.meeting_status)
            .and_then(|s| errors.check("meetingStatus", s.parse::<MeetingStatus>()));
        let client_status = non_blank(form.client_status)
            .and_then(|s| errors.check("clientStatus", s.parse::<ClientStatus>()));

        errors.finish()?;

        Ok(ClientPatch {
            name,
            address,
            phone,
            map_location_link,
            assigned_to,
            assigned_visit_date,
            summary: SummaryOverride {
                meeting_status,
                client_status,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> CreateClientForm {
        CreateClientForm {
            name: Some(" Acme ".to_string()),
            address: Some("1 Main St".to_string()),
            phone: Some("555-0100".to_string()),
            map_location_link: Some("https://maps.example.com/acme".to_string()),
            assigned_to: Some(4),
            assigned_visit_date: Some("2024-06-01".to_string()),
        }
    }

    #[test]
    fn create_form_to_payload() {
        let payload = CreateClientPayload::try_from(complete_form()).expect("valid form");

        assert_eq!(payload.name.as_str(), "Acme");
        assert_eq!(payload.assigned_to.get(), 4);
        assert_eq!(payload.assigned_visit_date.to_string(), "2024-06-01 00:00:00");
        assert!(payload.map_location_link.is_some());
    }

    #[test]
    fn create_form_reports_every_missing_field() {
        let form = CreateClientForm {
            name: Some("   ".to_string()),
            ..CreateClientForm::default()
        };

        let err = CreateClientPayload::try_from(form).expect_err("form is incomplete");

        assert_eq!(
            err.fields(),
            vec!["address", "assignedTo", "assignedVisitDate", "name", "phone"]
        );
    }

    #[test]
    fn create_form_rejects_long_name_and_bad_link() {
        let form = CreateClientForm {
            name: Some("x".repeat(201)),
            map_location_link: Some("not a url".to_string()),
            ..complete_form()
        };

        let err = CreateClientPayload::try_from(form).expect_err("form is invalid");

        assert_eq!(err.fields(), vec!["mapLocationLink", "name"]);
    }

    #[test]
    fn update_form_blank_fields_are_ignored() {
        let form = UpdateClientForm {
            name: Some("".to_string()),
            phone: Some("555-0199".to_string()),
            map_location_link: Some("".to_string()),
            ..UpdateClientForm::default()
        };

        let patch = ClientPatch::try_from(form).expect("valid form");

        assert_eq!(patch.name, None);
        assert_eq!(patch.phone.as_ref().map(ClientPhone::as_str), Some("555-0199"));
        assert_eq!(patch.map_location_link, Some(None));
    }

    #[test]
    fn update_form_parses_summary_override() {
        let form = UpdateClientForm {
            meeting_status: Some("visited".to_string()),
            client_status: Some("registered".to_string()),
            ..UpdateClientForm::default()
        };

        let patch = ClientPatch::try_from(form).expect("valid form");

        assert_eq!(patch.summary.meeting_status, Some(MeetingStatus::Visited));
        assert_eq!(patch.summary.client_status, Some(ClientStatus::Registered));
    }

    #[test]
    fn update_form_rejects_unknown_status() {
        let form = UpdateClientForm {
            meeting_status: Some("lost".to_string()),
            ..UpdateClientForm::default()
        };

        let err = ClientPatch::try_from(form).expect_err("status is unknown");

        assert_eq!(err.fields(), vec!["meetingStatus"]);
    }
}
