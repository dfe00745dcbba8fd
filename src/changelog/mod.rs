//! Changelog generation from conventional commits
//!
//! History is grouped into [TagSection]s, one per release tag, and rendered
//! to Markdown. The file is either regenerated in full or extended with the
//! section of the release being prepared.

pub mod generator;
pub mod model;
pub mod render;

pub use generator::{ChangelogGenerator, ChangelogUpdate, UpdateMode};
pub use model::{Changelog, CommitEntry, ReleaseBlock, TagSection};
pub use render::{Links, Renderer};
