//! Integration test suite for livetpl
//!
//! End-to-end tests that drive the `livetpl` binary and the async session
//! driver. Every test uses an isolated configuration and state store from
//! [`livetpl::test_utils::TestWorkspace`].
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: `init`, `render`, `export`, `engines` through the binary
//! - **config**: configuration discovery and validation
//! - **session**: live sessions on paused tokio time

mod cli;
mod config;
mod session;

use assert_cmd::Command;
use livetpl::test_utils::TestWorkspace;

/// A `livetpl` command bound to the workspace's isolated config.
pub fn livetpl(ws: &TestWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("livetpl").unwrap();
    cmd.arg("--config").arg(ws.config_path()).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}
