use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::actor::Actor;
use crate::dto::client::MessageResponse;
use crate::dto::team::{TeamMemberResponse, TeamMembersResponse};
use crate::forms::team::{AddTeamMemberForm, UpdateTeamMemberForm};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::team as service;

#[get("/team")]
pub async fn list_team_members(
    actor: Actor,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let team_members = service::list_team_members(repo.get_ref(), &actor)?;

    Ok(HttpResponse::Ok().json(TeamMembersResponse { team_members }))
}

#[post("/team")]
pub async fn add_team_member(
    actor: Actor,
    form: web::Json<AddTeamMemberForm>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let user = service::add_team_member(repo.get_ref(), &actor, form.into_inner())?;

    Ok(HttpResponse::Created().json(TeamMemberResponse {
        message: Some("Team member added successfully"),
        user,
    }))
}

#[get("/team/{id}")]
pub async fn get_team_member(
    actor: Actor,
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let user = service::get_team_member(repo.get_ref(), &actor, id.into_inner())?;

    Ok(HttpResponse::Ok().json(TeamMemberResponse {
        message: None,
        user,
    }))
}

#[put("/team/{id}")]
pub async fn update_team_member(
    actor: Actor,
    id: web::Path<i32>,
    form: web::Json<UpdateTeamMemberForm>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let user = service::update_team_member(
        repo.get_ref(),
        &actor,
        id.into_inner(),
        form.into_inner(),
    )?;

    Ok(HttpResponse::Ok().json(TeamMemberResponse {
        message: Some("Team member updated successfully"),
        user,
    }))
}

#[delete("/team/{id}")]
pub async fn delete_team_member(
    actor: Actor,
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    service::delete_team_member(repo.get_ref(), &actor, id.into_inner())?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Team member deleted successfully",
    }))
}
