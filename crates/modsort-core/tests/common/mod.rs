//! Shared helpers for integration tests.

pub mod catalog_server;
