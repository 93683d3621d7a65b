//! Test utilities for Pacer rate limit tests.
//!
//! This module provides mock counter stores.

pub mod mock_store;

#[allow(unused_imports)]
pub use mock_store::{CountingStore, FailingStore};
