//! Domain logic - pure release rules independent of git operations

pub mod commit;
pub mod version;

pub use commit::ParsedCommit;
pub use version::{Version, VersionBump};
