use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::actor::Actor;
use crate::dto::client::{ClientResponse, ClientsQuery, ClientsResponse, MessageResponse};
use crate::forms::client::{CreateClientForm, UpdateClientForm};
use crate::forms::visit::RecordVisitForm;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::{clients as service, visits};

#[get("/clients")]
pub async fn list_clients(
    actor: Actor,
    query: web::Query<ClientsQuery>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let clients = service::list_clients(repo.get_ref(), &actor, query.into_inner())?;

    Ok(HttpResponse::Ok().json(ClientsResponse { clients }))
}

#[post("/clients")]
pub async fn create_client(
    actor: Actor,
    form: web::Json<CreateClientForm>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = service::create_client(repo.get_ref(), &actor, form.into_inner())?;

    Ok(HttpResponse::Created().json(ClientResponse {
        message: Some("Client created successfully"),
        client,
    }))
}

#[get("/clients/{id}")]
pub async fn get_client(
    actor: Actor,
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = service::get_client(repo.get_ref(), &actor, id.into_inner())?;

    Ok(HttpResponse::Ok().json(ClientResponse {
        message: None,
        client,
    }))
}

#[put("/clients/{id}")]
pub async fn update_client(
    actor: Actor,
    id: web::Path<i32>,
    form: web::Json<UpdateClientForm>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = service::update_client(
        repo.get_ref(),
        &actor,
        id.into_inner(),
        form.into_inner(),
    )?;

    Ok(HttpResponse::Ok().json(ClientResponse {
        message: Some("Client updated successfully"),
        client,
    }))
}

#[delete("/clients/{id}")]
pub async fn delete_client(
    actor: Actor,
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    service::delete_client(repo.get_ref(), &actor, id.into_inner())?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Client deleted successfully",
    }))
}

#[post("/clients/{id}/visit")]
pub async fn record_visit(
    actor: Actor,
    id: web::Path<i32>,
    form: web::Json<RecordVisitForm>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = visits::record_visit(
        repo.get_ref(),
        &actor,
        id.into_inner(),
        form.into_inner(),
    )?;

    Ok(HttpResponse::Created().json(ClientResponse {
        message: Some("Visit recorded successfully"),
        client,
    }))
}

#[post("/clients/{id}/recompute")]
pub async fn recompute_client(
    actor: Actor,
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = service::recompute_client(repo.get_ref(), &actor, id.into_inner())?;

    Ok(HttpResponse::Ok().json(ClientResponse {
        message: Some("Client summary recomputed"),
        client,
    }))
}
