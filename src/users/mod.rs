mod dto;
mod entity;
pub mod handlers;
mod password;
mod repo;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
