//! JSON endpoints mounted under `/api`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use serde::Serialize;

use crate::services::ServiceError;

pub mod clients;
pub mod dashboard;
pub mod team;

/// Error body: `{"error": message}` plus the failing fields on validation.
#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<&'a [String]>,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::AccessDenied => StatusCode::FORBIDDEN,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let fields = match self {
            ServiceError::Validation(fields) => Some(fields.as_slice()),
            _ => None,
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            fields,
        })
    }
}

/// JSON extractor settings: malformed bodies are reported as a validation
/// failure of the `body` field.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected request body: {err}");
        ServiceError::Validation(vec!["body".to_string()]).into()
    })
}

/// Registers every endpoint on the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(clients::list_clients)
        .service(clients::create_client)
        .service(clients::get_client)
        .service(clients::update_client)
        .service(clients::delete_client)
        .service(clients::record_visit)
        .service(clients::recompute_client)
        .service(dashboard::stats)
        .service(team::list_team_members)
        .service(team::add_team_member)
        .service(team::get_team_member)
        .service(team::update_team_member)
        .service(team::delete_team_member);
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    #[test]
    fn errors_map_to_status_codes() {
        assert_eq!(ServiceError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServiceError::AccessDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ServiceError::Validation(Vec::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServiceError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServiceError::Conflict("position".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn validation_body_lists_fields() {
        let err = ServiceError::Validation(vec!["name".into(), "phone".into()]);
        let body = to_bytes(err.error_response().into_body())
            .await
            .expect("body is readable");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("body is json");

        assert_eq!(json["fields"], serde_json::json!(["name", "phone"]));
        assert_eq!(json["error"], "Validation failed: name, phone");
    }

    #[actix_web::test]
    async fn other_errors_have_no_fields() {
        let body = to_bytes(ServiceError::NotFound.error_response().into_body())
            .await
            .expect("body is readable");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("body is json");

        assert_eq!(json, serde_json::json!({"error": "Not found"}));
    }
}
