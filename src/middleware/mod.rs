pub mod auth;

pub use auth::{authenticate, require_admin, AccessToken, FreshToken, RefreshToken};
