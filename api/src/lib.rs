pub mod app_state;
pub mod assembler;
pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod infra;
pub mod openapi;
pub mod pagination;
pub mod query;
pub mod repository;
pub mod telemetry;
