// Presentation layer - HTTP surface for the dashboard renderer
pub mod app_state;
pub mod handlers;
pub mod router;
