//! Core modules for promptsync's instruction state and synchronization.
//!
//! All persistent state and shared primitives live here.

pub mod broker;
pub mod clock;
pub mod config;
pub mod cooldown;
pub mod db;
pub mod error;
pub mod format;
pub mod manager;
pub mod remote;
pub mod remote_http;
pub mod store;
pub mod versions;
