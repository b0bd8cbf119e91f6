//! CLI command implementations.

pub mod check;
pub mod init;

pub use check::{run_check, CheckOptions};
pub use init::init_config;
