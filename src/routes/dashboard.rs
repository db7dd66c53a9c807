use actix_web::{HttpResponse, get, web};

use crate::domain::actor::Actor;
use crate::dto::client::parse_day;
use crate::dto::dashboard::{StatsQuery, StatsResponse};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::dashboard::dashboard_stats;

#[get("/dashboard/stats")]
pub async fn stats(
    actor: Actor,
    query: web::Query<StatsQuery>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let date = parse_day(query.date.as_deref());
    let stats = dashboard_stats(repo.get_ref(), &actor, date)?;

    Ok(HttpResponse::Ok().json(StatsResponse { stats }))
}
