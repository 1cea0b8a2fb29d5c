use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{RecipeDetailResponse, RecipeListQuery, RecipePatch, RecipePayload, RecipeResponse},
    repo::RecipeStore,
    services::{filter_from_query, full_changes, new_recipe, partial_changes},
};
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipe/recipes/", get(list_recipes).post(create_recipe))
        .route(
            "/recipe/recipes/:id/",
            get(get_recipe)
                .patch(patch_recipe)
                .put(put_recipe)
                .delete(delete_recipe),
        )
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RecipeListQuery>,
) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let filter = filter_from_query(&q)?;
    let recipes = state.store.list_recipes(user_id, &filter).await?;
    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RecipePayload>,
) -> ApiResult<(StatusCode, Json<RecipeDetailResponse>)> {
    let new = new_recipe(payload)?;
    let recipe = state.store.create_recipe(user_id, new).await?;
    info!(%user_id, recipe_id = recipe.row.id, "recipe created");
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<RecipeDetailResponse>> {
    let recipe = state
        .store
        .get_recipe(user_id, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(recipe.into()))
}

#[instrument(skip(state, patch))]
pub async fn patch_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(patch): Json<RecipePatch>,
) -> ApiResult<Json<RecipeDetailResponse>> {
    let changes = partial_changes(patch)?;
    let recipe = state
        .store
        .update_recipe(user_id, id, changes)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(recipe.into()))
}

#[instrument(skip(state, payload))]
pub async fn put_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<RecipePayload>,
) -> ApiResult<Json<RecipeDetailResponse>> {
    let changes = full_changes(payload)?;
    let recipe = state
        .store
        .update_recipe(user_id, id, changes)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(recipe.into()))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_recipe(user_id, id).await? {
        return Err(ApiError::NotFound);
    }
    info!(%user_id, recipe_id = id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
