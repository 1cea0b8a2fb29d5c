use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{AttrPatch, AttrPayload, AttrResponse, ListQuery},
    repo::AttrStore,
    repo_types::AttrKind,
    services::{clean_name, parse_assigned_only},
};
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Binds the shared handlers to one kind of recipe attribute.
pub trait AttrResource: Send + Sync + 'static {
    const KIND: AttrKind;
}

pub enum Ingredients {}

impl AttrResource for Ingredients {
    const KIND: AttrKind = AttrKind::Ingredient;
}

pub enum Tags {}

impl AttrResource for Tags {
    const KIND: AttrKind = AttrKind::Tag;
}

pub fn resource_routes<R: AttrResource>(base: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("{base}/"), get(list::<R>).post(create::<R>))
        .route(
            &format!("{base}/:id/"),
            get(retrieve::<R>)
                .patch(partial_update::<R>)
                .put(update::<R>)
                .delete(destroy::<R>),
        )
}

#[instrument(skip(state), fields(kind = R::KIND.label()))]
pub async fn list<R: AttrResource>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ListQuery>,
) -> ApiResult<Json<Vec<AttrResponse>>> {
    let assigned_only = parse_assigned_only(q.assigned_only.as_deref())?;
    let rows = state
        .store
        .list_attrs(R::KIND, user_id, assigned_only)
        .await?;
    Ok(Json(rows.into_iter().map(AttrResponse::from).collect()))
}

#[instrument(skip(state, payload), fields(kind = R::KIND.label()))]
pub async fn create<R: AttrResource>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AttrPayload>,
) -> ApiResult<(StatusCode, Json<AttrResponse>)> {
    let name = clean_name(&payload.name)?;
    let attr = state.store.create_attr(R::KIND, user_id, &name).await?;
    info!(%user_id, id = attr.id, kind = R::KIND.label(), "created");
    Ok((StatusCode::CREATED, Json(attr.into())))
}

#[instrument(skip(state), fields(kind = R::KIND.label()))]
pub async fn retrieve<R: AttrResource>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<AttrResponse>> {
    let attr = state
        .store
        .get_attr(R::KIND, user_id, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(attr.into()))
}

#[instrument(skip(state, payload), fields(kind = R::KIND.label()))]
pub async fn partial_update<R: AttrResource>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<AttrPatch>,
) -> ApiResult<Json<AttrResponse>> {
    let attr = match payload.name {
        Some(name) => {
            let name = clean_name(&name)?;
            state.store.rename_attr(R::KIND, user_id, id, &name).await?
        }
        None => state.store.get_attr(R::KIND, user_id, id).await?,
    };
    Ok(Json(attr.ok_or(ApiError::NotFound)?.into()))
}

#[instrument(skip(state, payload), fields(kind = R::KIND.label()))]
pub async fn update<R: AttrResource>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<AttrPayload>,
) -> ApiResult<Json<AttrResponse>> {
    let name = clean_name(&payload.name)?;
    let attr = state
        .store
        .rename_attr(R::KIND, user_id, id, &name)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(attr.into()))
}

#[instrument(skip(state), fields(kind = R::KIND.label()))]
pub async fn destroy<R: AttrResource>(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_attr(R::KIND, user_id, id).await? {
        return Err(ApiError::NotFound);
    }
    info!(%user_id, id, kind = R::KIND.label(), "deleted");
    Ok(StatusCode::NO_CONTENT)
}
