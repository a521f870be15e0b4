//! Food Mood Core - Shared types library.
//!
//! This crate provides the common types used by the storefront gateway:
//! newtype ID wrappers for the backend's entity references and a validated
//! email address type.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async.
//! This keeps it lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
