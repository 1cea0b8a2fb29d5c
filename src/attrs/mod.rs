mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use dto::AttrResponse;
pub use handlers::{Ingredients, Tags};
pub use repo::AttrStore;
pub use repo_types::{Attr, AttrKind};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::resource_routes::<Ingredients>("/recipe/ingredients"))
        .merge(handlers::resource_routes::<Tags>("/recipe/tags"))
}
