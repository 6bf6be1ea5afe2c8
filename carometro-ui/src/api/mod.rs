//! HTTP API handlers for carometro-ui

pub mod health;
pub mod photos;
pub mod roster;
pub mod sse;
pub mod ui;

pub use health::health_routes;
pub use photos::save_photo;
pub use roster::roster_routes;
pub use sse::event_stream;
pub use ui::ui_routes;
