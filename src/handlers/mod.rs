// handlers/mod.rs - Handler tiers
//
// Public (no token) → Protected (access, fresh access or refresh token).
// Admin-only operations live in the protected tier and check the
// `is_admin` claim themselves.
pub mod protected;
pub mod public;
