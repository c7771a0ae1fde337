pub(crate) mod handlers;
pub mod merge;
pub mod service;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
