//! Repository trait definitions for data persistence
//!
//! Lists are always loaded and written whole: there is no incremental
//! update and the last write wins.

use hoken_types::Result;

use crate::model::{Claim, Policy};

/// Repository for issued policies
pub trait PolicyRepository {
    /// Load every stored policy in stored order
    fn load_all(&self) -> Result<Vec<Policy>>;

    /// Overwrite the stored list
    fn save_all(&self, policies: &[Policy]) -> Result<()>;

    /// Drop everything
    fn clear(&self) -> Result<()>;
}

/// Repository for filed claims
pub trait ClaimRepository {
    /// Load every stored claim, most recent first
    fn load_all(&self) -> Result<Vec<Claim>>;

    /// Overwrite the stored list
    fn save_all(&self, claims: &[Claim]) -> Result<()>;

    /// Drop everything
    fn clear(&self) -> Result<()>;
}
