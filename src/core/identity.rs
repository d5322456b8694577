//! Caller identity
//!
//! Authentication happens upstream. The core only consumes the resolved
//! identity of the caller: an id and one role out of a closed set.
//!
//! Handlers obtain it through the [`Caller`] and [`MaybeCaller`] extractors,
//! which delegate to the configured [`IdentityProvider`].

use crate::core::error::{ShopError, ShopResult};
use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Role of an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Seller,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Seller => "seller",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "seller" => Ok(Role::Seller),
            // "common" is accepted as an alias of the default role
            "user" | "common" => Ok(Role::User),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// The authenticated caller of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn user(id: Uuid) -> Self {
        Self::new(id, Role::User)
    }

    pub fn seller(id: Uuid) -> Self {
        Self::new(id, Role::Seller)
    }

    pub fn admin(id: Uuid) -> Self {
        Self::new(id, Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Resolves the caller identity from an inbound request
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns `Ok(None)` for anonymous requests.
    async fn identify(&self, parts: &Parts) -> ShopResult<Option<Identity>>;
}

/// Trusts identity headers set by an authenticating gateway.
///
/// A request without the id header is anonymous. A request with an id but
/// no role header gets the default `user` role.
#[derive(Debug, Clone)]
pub struct HeaderIdentityProvider {
    user_header: String,
    role_header: String,
}

impl HeaderIdentityProvider {
    pub const DEFAULT_USER_HEADER: &'static str = "x-user-id";
    pub const DEFAULT_ROLE_HEADER: &'static str = "x-user-role";

    pub fn new(user_header: impl Into<String>, role_header: impl Into<String>) -> Self {
        Self {
            user_header: user_header.into(),
            role_header: role_header.into(),
        }
    }

    fn header<'a>(parts: &'a Parts, name: &str) -> ShopResult<Option<&'a str>> {
        parts
            .headers
            .get(name)
            .map(|value| {
                value
                    .to_str()
                    .map_err(|_| ShopError::bad_header(name, "not valid ASCII"))
            })
            .transpose()
    }
}

impl Default for HeaderIdentityProvider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_USER_HEADER, Self::DEFAULT_ROLE_HEADER)
    }
}

#[async_trait]
impl IdentityProvider for HeaderIdentityProvider {
    async fn identify(&self, parts: &Parts) -> ShopResult<Option<Identity>> {
        let Some(raw_id) = Self::header(parts, &self.user_header)? else {
            return Ok(None);
        };

        let id = Uuid::parse_str(raw_id.trim())
            .map_err(|_| ShopError::bad_header(&self.user_header, "not a valid UUID"))?;

        let role = match Self::header(parts, &self.role_header)? {
            Some(raw) => raw
                .parse::<Role>()
                .map_err(|e| ShopError::bad_header(&self.role_header, &e))?,
            None => Role::default(),
        };

        Ok(Some(Identity::new(id, role)))
    }
}

/// Shared handle on the identity provider, extracted from router state
#[derive(Clone)]
pub struct IdentitySource(pub Arc<dyn IdentityProvider>);

impl IdentitySource {
    pub fn new(provider: impl IdentityProvider + 'static) -> Self {
        Self(Arc::new(provider))
    }
}

/// Extractor for operations that require an authenticated caller
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub Identity);

/// Extractor for operations open to anonymous callers
#[derive(Debug, Clone, Copy)]
pub struct MaybeCaller(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeCaller
where
    S: Send + Sync,
    IdentitySource: FromRef<S>,
{
    type Rejection = ShopError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let source = IdentitySource::from_ref(state);
        let identity = source.0.identify(parts).await?;
        Ok(MaybeCaller(identity))
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
    IdentitySource: FromRef<S>,
{
    type Rejection = ShopError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeCaller(identity) = MaybeCaller::from_request_parts(parts, state).await?;
        identity.map(Caller).ok_or(ShopError::Unauthenticated)
    }
}
