//! twinlink-utils: Common utilities shared across twinlink crates
//!
//! This crate provides:
//! - Unified error types ([`TwinError`], [`Result`])
//! - Logging infrastructure ([`init_logging`], [`LogConfig`])
//! - XDG-compliant path utilities ([`paths`] module)

pub mod error;
pub mod logging;
pub mod paths;

// Re-export main types at crate root for convenience
pub use error::{Result, TwinError};
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogOutput};

// Re-export commonly used path functions
pub use paths::{ensure_dir, log_dir, scene_socket_path, work_dir};
