//! carometro-ui library - roster photo capture service
//!
//! Serves the browser UI, the roster API and the photo persistence endpoint.

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use carometro_common::events::EventBus;
use carometro_common::photo::{PhotoStore, PUBLIC_PHOTOS_PREFIX};
use carometro_common::Roster;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Current roster; replaced on import, mutated on photo save
    pub roster: Arc<RwLock<Roster>>,
    /// Destination for captured photos
    pub photos: PhotoStore,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(photos: PhotoStore, event_bus: EventBus) -> Self {
        Self {
            roster: Arc::new(RwLock::new(Roster::new())),
            photos,
            event_bus,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// `max_upload_bytes` caps request bodies (CSV uploads and photo data URLs).
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    use axum::routing::{get, post};

    let photos = ServeDir::new(state.photos.dir());

    Router::new()
        .merge(api::ui_routes())
        .merge(api::roster_routes())
        .route("/api/save-photo", post(api::save_photo))
        .route("/api/events", get(api::event_stream))
        .merge(api::health_routes())
        .nest_service(PUBLIC_PHOTOS_PREFIX, photos)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
