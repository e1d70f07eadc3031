pub mod events;
pub mod points;
pub mod profile;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(events::routes())
        .merge(points::routes())
        .merge(profile::routes())
}
