//! Common test utilities for campaign-deploy CLI tests.
//!
//! This module provides:
//! - `TestEnv`: isolated project directory with the deployable tree
//! - Fixtures: config snippets reused across tests

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
