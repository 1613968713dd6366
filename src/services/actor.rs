use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // driver or staff id
    #[serde(default)]
    pub admin: bool,
    pub exp: usize,
}

impl Claims {
    pub fn new(actor_id: Uuid, admin: bool, ttl: Duration) -> Self {
        Self {
            sub: actor_id,
            admin,
            exp: (Utc::now() + ttl).timestamp().max(0) as usize,
        }
    }

    pub fn encode(&self, secret: &str) -> Result<String, AppError> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .map_err(|e| AppError::internal_server_error_message(e.to_string()))
    }
}

/// The authenticated caller. Tokens are issued elsewhere; this only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub is_admin: bool,
}

impl Actor {
    pub fn driver(id: Uuid) -> Self {
        Self {
            id,
            is_admin: false,
        }
    }

    pub fn admin(id: Uuid) -> Self {
        Self { id, is_admin: true }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }

    fn from_token(token: &str, secret: &str) -> Result<Self, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            log::debug!("Rejected bearer token: {}", e);
            AppError::Unauthorized
        })?;

        Ok(Self {
            id: data.claims.sub,
            is_admin: data.claims.admin,
        })
    }
}

impl FromRequest for Actor {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = token else {
            return ready(Err(AppError::Unauthorized));
        };

        let Some(config) = req.app_data::<Data<Config>>() else {
            log::error!("Config missing from app data");
            return ready(Err(AppError::internal_server_error_message(
                "configuration unavailable",
            )));
        };

        ready(Self::from_token(token, &config.jwt_secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn decodes_admin_flag_from_token() {
        let id = Uuid::new_v4();
        let token = Claims::new(id, true, Duration::hours(1))
            .encode(SECRET)
            .unwrap();

        let actor = Actor::from_token(&token, SECRET).unwrap();
        assert_eq!(actor, Actor::admin(id));
    }

    #[test]
    fn rejects_token_signed_with_another_secret() {
        let token = Claims::new(Uuid::new_v4(), false, Duration::hours(1))
            .encode("other")
            .unwrap();

        assert!(matches!(
            Actor::from_token(&token, SECRET),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn drivers_are_not_admins() {
        assert!(Actor::driver(Uuid::new_v4()).require_admin().is_err());
        assert!(Actor::admin(Uuid::new_v4()).require_admin().is_ok());
    }
}
