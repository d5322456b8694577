//! HTTP handlers for resource operations
//!
//! Handlers are generic over the resource type; each is instantiated once
//! per kind by [`resource_routes`](super::router::resource_routes).

use crate::core::error::{ShopError, ShopResult, ValidationError};
use crate::core::identity::{Caller, IdentitySource, MaybeCaller};
use crate::core::query::{PageLimits, PaginatedResponse, QueryParams};
use crate::core::resource::Resource;
use crate::core::validation::ValidatedJson;
use crate::service::ResourceService;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRef, Path, Query, State};
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Router state for the routes of one resource kind
pub struct ResourceState<T: Resource> {
    pub service: Arc<ResourceService<T>>,
    pub identity: IdentitySource,
    pub limits: PageLimits,
}

// Derived Clone would require T: Clone on the state, not just the record
impl<T: Resource> Clone for ResourceState<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            identity: self.identity.clone(),
            limits: self.limits,
        }
    }
}

impl<T: Resource> FromRef<ResourceState<T>> for IdentitySource {
    fn from_ref(state: &ResourceState<T>) -> Self {
        state.identity.clone()
    }
}

type ListParams = Result<Query<QueryParams>, QueryRejection>;

fn parse_id(raw: &str) -> ShopResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        ShopError::Validation(ValidationError::InvalidId {
            value: raw.to_string(),
        })
    })
}

fn list_query(params: ListParams, limits: &PageLimits) -> ShopResult<crate::core::query::ListQuery> {
    let Query(params) = params.map_err(|e| ShopError::invalid_filter(e.body_text()))?;
    params.to_list_query(limits)
}

/// POST /{plural}
pub async fn create<T: Resource>(
    State(state): State<ResourceState<T>>,
    MaybeCaller(caller): MaybeCaller,
    ValidatedJson(draft): ValidatedJson<T::Draft>,
) -> ShopResult<(StatusCode, Json<T::Public>)> {
    let record = state.service.create(draft, caller.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(record.into_public())))
}

/// GET /{plural}
pub async fn list<T: Resource>(
    State(state): State<ResourceState<T>>,
    Caller(caller): Caller,
    params: ListParams,
) -> ShopResult<Json<PaginatedResponse<T::Public>>> {
    let query = list_query(params, &state.limits)?;
    let page = state.service.list(&caller, query).await?;
    Ok(Json(page.map(Resource::into_public)))
}

/// GET /{plural}/{id}
pub async fn get<T: Resource>(
    State(state): State<ResourceState<T>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> ShopResult<Json<T::Public>> {
    let record = state.service.get(parse_id(&id)?, &caller).await?;
    Ok(Json(record.into_public()))
}

/// PATCH /{plural}/{id}
pub async fn update<T: Resource>(
    State(state): State<ResourceState<T>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<T::Patch>,
) -> ShopResult<Json<T::Public>> {
    let record = state.service.update(parse_id(&id)?, &caller, patch).await?;
    Ok(Json(record.into_public()))
}

/// DELETE /{plural}/{id}
pub async fn delete<T: Resource>(
    State(state): State<ResourceState<T>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> ShopResult<StatusCode> {
    state.service.delete(parse_id(&id)?, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /{plural}/{id}/disable
pub async fn disable<T: Resource>(
    State(state): State<ResourceState<T>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> ShopResult<StatusCode> {
    state.service.disable(parse_id(&id)?, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /{plural}/{id}/enable
pub async fn enable<T: Resource>(
    State(state): State<ResourceState<T>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> ShopResult<StatusCode> {
    state.service.enable(parse_id(&id)?, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /{plural}/{id}/{related}
pub async fn get_related<T: Resource>(
    State(state): State<ResourceState<T>>,
    Caller(caller): Caller,
    Path((id, related)): Path<(String, String)>,
    params: ListParams,
) -> ShopResult<Json<PaginatedResponse<Value>>> {
    let query = list_query(params, &state.limits)?;
    let page = state
        .service
        .get_related(parse_id(&id)?, &related, &caller, query)
        .await?;
    Ok(Json(page))
}
