// handlers/public/mod.rs - Public handlers (no token required)
//
// Service description, health and the token acquisition endpoints.
pub mod auth;
pub mod service;
