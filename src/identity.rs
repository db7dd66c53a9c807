//! Bearer-token identity adapter.
//!
//! Tokens are HS256 JWTs signed with the shared `secret` from
//! [`ServerConfig`]. The claims are trusted verbatim once the signature and
//! expiry check out.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::actor::Actor;
use crate::domain::types::{Role, UserId};
use crate::models::config::ServerConfig;
use crate::services::{ServiceError, ServiceResult};

/// Claims carried by an identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Numeric user id, as a string.
    pub sub: String,
    pub role: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: u64,
}

impl Claims {
    pub fn for_actor(actor: &Actor, ttl: Duration) -> Self {
        let exp = (Utc::now() + ttl).timestamp().max(0) as u64;
        Self {
            sub: actor.user_id.to_string(),
            role: actor.role.to_string(),
            exp,
        }
    }
}

impl TryFrom<Claims> for Actor {
    type Error = ServiceError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| ServiceError::Unauthorized)?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| ServiceError::Unauthorized)?;
        Ok(Actor::new(user_id, role))
    }
}

/// Verifies `token` and returns the actor it names.
pub fn authenticate(token: &str, secret: &str) -> ServiceResult<Actor> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|err| {
        log::warn!("Rejected bearer token: {err}");
        ServiceError::Unauthorized
    })?;

    Actor::try_from(data.claims)
}

/// Signs a token for `actor` valid for `ttl`.
pub fn issue_token(
    actor: &Actor,
    secret: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &Claims::for_actor(actor, ttl),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn actor_from_request(req: &HttpRequest) -> ServiceResult<Actor> {
    let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
        log::error!("Server configuration is not registered");
        return Err(ServiceError::Internal);
    };
    let token = bearer_token(req).ok_or(ServiceError::Unauthorized)?;
    authenticate(token, &config.secret)
}

impl FromRequest for Actor {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(actor_from_request(req))
    }
}
