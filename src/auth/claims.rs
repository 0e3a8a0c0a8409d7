use serde::{Deserialize, Serialize};

/// Authorization claims attached to every issued token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalClaims {
    pub is_admin: bool,
}

/// Derives authorization claims from a principal id alone.
///
/// A single designated principal is the administrator; nothing is looked up
/// in storage.
#[derive(Debug, Clone, Copy)]
pub struct ClaimsAugmenter {
    admin_principal: i64,
}

impl ClaimsAugmenter {
    pub fn new(admin_principal: i64) -> Self {
        Self { admin_principal }
    }

    pub fn compute(&self, principal_id: i64) -> AdditionalClaims {
        AdditionalClaims {
            is_admin: principal_id == self.admin_principal,
        }
    }
}

impl Default for ClaimsAugmenter {
    fn default() -> Self {
        Self::new(1)
    }
}
