//! Core library components.
//!
//! The cache itself: key encoding, the expiring store and its facade, blob
//! protection, and the persisted file.

pub mod cache;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod persist;
pub mod secrets;
pub mod session;
pub mod store;
