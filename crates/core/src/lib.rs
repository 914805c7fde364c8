//! Core types for the depot artifact-repository index toolkit
//!
//! This crate provides the foundational abstractions used throughout the
//! depot workspace, including:
//!
//! - **Artifacts**: Maven-style coordinates and repository descriptors
//! - **Configuration**: repository and index settings
//! - **Error handling**: Unified error types
//!

pub mod artifact;
pub mod config;
pub mod error;

// Re-export main types for convenience
pub use artifact::{ArtifactInfo, ArtifactInfoBuilder, RepositoryInfo, RepositoryKind};
pub use config::{Config, RepositoryConfig};
pub use error::{Error, Result, ResultExt};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::artifact::{ArtifactInfo, RepositoryInfo, RepositoryKind};
    pub use crate::config::Config;
    pub use crate::error::{Result, ResultExt};
}
