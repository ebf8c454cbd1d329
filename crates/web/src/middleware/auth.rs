use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use storage::models::Role;

use crate::error::WebError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Bearer keys of the gateways allowed to call the dashboard API.
#[derive(Clone)]
pub struct ApiKeys {
    keys: Arc<HashSet<String>>,
}

impl ApiKeys {
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let keys = keys_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            keys: Arc::new(keys),
        }
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        Some(token) if api_keys.is_valid(token) => Ok(next.run(request).await),
        _ => {
            tracing::warn!("Invalid API key attempt");
            Err(WebError::Unauthorized)
        }
    }
}

/// Identity of the caller as forwarded by the authenticating gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    pub user_id: i64,
    pub role: Role,
}

impl CallerContext {
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), WebError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = self.user_id,
                role = %self.role,
                "Caller requested a dashboard outside its role"
            );
            Err(WebError::Forbidden)
        }
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, WebError> {
    headers
        .get(name)
        .ok_or(WebError::Unauthorized)?
        .to_str()
        .map(str::trim)
        .map_err(|_| WebError::BadRequest(format!("{name} header is not valid text")))
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerContext
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(&parts.headers, USER_ID_HEADER)?
            .parse::<i64>()
            .map_err(|_| WebError::BadRequest("user id must be numeric".to_string()))?;

        let role = header(&parts.headers, USER_ROLE_HEADER)?
            .parse::<Role>()
            .map_err(|e| WebError::BadRequest(e.to_string()))?;

        Ok(Self { user_id, role })
    }
}
