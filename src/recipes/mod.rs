mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::RecipeStore;
pub use repo_types::{NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeRow};

pub fn router() -> Router<AppState> {
    handlers::recipe_routes()
}
