// Library exports for BlogHub
// This allows integration tests and external code to use BlogHub modules

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
