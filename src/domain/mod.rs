// Domain layer - Core models for the fleet dashboard
pub mod chat;
pub mod ranking;
pub mod risk;
pub mod session;
pub mod telemetry;
