pub mod blocklist;
pub mod claims;
pub mod decision;
pub mod password;
pub mod token;

pub use blocklist::{Blocklist, RevocationChecker};
pub use claims::{AdditionalClaims, ClaimsAugmenter};
pub use decision::{evaluate, AuthRejection, AuthUser, TokenRequirement};
pub use token::{JwtClaims, JwtError, JwtKeys, TokenKind, TokenRecord};
