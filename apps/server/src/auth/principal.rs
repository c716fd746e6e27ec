//! Authenticated caller extraction

use super::Claims;
use crate::{models::Role, state::AppState, Error, Result};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The caller identified by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub role: Role,
    pub role_id: i32,
    pub email: String,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
            role_id: claims.role_id,
            email: claims.email,
        }
    }
}

/// Decodes the bearer token, when present, and stores the [`Principal`] in
/// request extensions. Requests without an `Authorization` header pass
/// through untouched; a bad token is rejected with 401.
pub async fn auth_middleware(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let principal = match bearer_token(req.headers()) {
        Ok(None) => None,
        Ok(Some(token)) => match state.tokens.verify(&token) {
            Ok(claims) => Some(Principal::from(claims)),
            Err(e) => return e.into_response(),
        },
        Err(e) => return e.into_response(),
    };

    if let Some(principal) = principal {
        req.extensions_mut().insert(principal);
    }

    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Result<Option<String>> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| Error::Unauthorized("Malformed authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(|token| Some(token.trim().to_string()))
        .ok_or_else(|| Error::Unauthorized("Expected a bearer token".to_string()))
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| Error::Unauthorized("Authentication required".to_string()))
    }
}

/// A signed-in patient.
#[derive(Debug, Clone)]
pub struct PatientPrincipal(pub Principal);

impl PatientPrincipal {
    pub fn patient_id(&self) -> i32 {
        self.0.role_id
    }

    /// Rejects access to another patient's resources.
    pub fn ensure_self(&self, patient_id: i32) -> Result<()> {
        if self.patient_id() != patient_id {
            return Err(Error::Forbidden(
                "Patients may only access their own profile".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PatientPrincipal
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let principal = Principal::from_request_parts(parts, state).await?;
        if principal.role != Role::Patient {
            return Err(Error::Forbidden("Patient account required".to_string()));
        }
        Ok(Self(principal))
    }
}

/// A signed-in provider.
#[derive(Debug, Clone)]
pub struct ProviderPrincipal(pub Principal);

impl ProviderPrincipal {
    pub fn provider_id(&self) -> i32 {
        self.0.role_id
    }

    /// Rejects access to another provider's resources.
    pub fn ensure_self(&self, provider_id: i32) -> Result<()> {
        if self.provider_id() != provider_id {
            return Err(Error::Forbidden(
                "Providers may only modify their own profile".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ProviderPrincipal
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let principal = Principal::from_request_parts(parts, state).await?;
        if principal.role != Role::Provider {
            return Err(Error::Forbidden("Provider account required".to_string()));
        }
        Ok(Self(principal))
    }
}
