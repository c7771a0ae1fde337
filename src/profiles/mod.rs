pub(crate) mod handlers;
pub mod prefs;
pub mod repo;
pub mod service;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
