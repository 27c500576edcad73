// Application layer - Use cases and the seams to external collaborators
pub mod assistant_proxy;
pub mod auth_service;
pub mod chat_relay;
pub mod dashboard_service;
pub mod normalizer;
pub mod ranking_aggregator;
pub mod risk_classifier;
pub mod session_store;
pub mod telemetry_client;
pub mod view_registry;
