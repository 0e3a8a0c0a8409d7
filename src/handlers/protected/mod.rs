// handlers/protected/mod.rs - Protected handlers (token required)
//
// Each handler names the token it needs through its first extractor
// (`AccessToken`, `FreshToken` or `RefreshToken`), so a rejected token
// never reaches the handler body.
pub mod items;
pub mod session;
pub mod stores;
pub mod tags;
pub mod users;
