//! Hook commands run around the release
//!
//! - before: end of the prepare phase, after files are bumped
//! - after: once the release commit and tag exist

pub mod executor;
pub mod lifecycle;

pub use executor::{CommandRunner, HookExecutor, ProcessRunner, RecordingRunner};
pub use lifecycle::{HookCommand, HookStage};
