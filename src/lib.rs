pub mod app;
pub mod config;
pub mod error;
pub mod response;
pub mod state;
pub mod telemetry;
pub mod users;
