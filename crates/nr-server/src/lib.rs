//! Shared library surface for the NR configuration server and its tests.

pub mod api;
pub mod cache;
pub mod config;
pub mod state;
