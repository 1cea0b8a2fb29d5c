mod dto;
pub mod handlers;
pub mod layout;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::user_admin_routes()
}
