pub mod bumper;
pub mod changelog;
pub mod config;
pub mod domain;
pub mod error;
pub mod fs;
pub mod git;
pub mod hooks;
pub mod orchestrator;
pub mod resolver;
pub mod ui;
pub mod warning;

pub use error::{ReleaseError, Result};
