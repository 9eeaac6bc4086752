//! Core types, contract model, and configuration for warden.
//!
//! This crate provides the foundational data structures used across all warden crates:
//! - [`contract`]: The validated [`Contract`](contract::Contract) and its per-function specs
//! - [`descriptor`]: Untyped contract descriptions as supplied by a loader
//! - [`schema`]: Pluggable schema descriptions and shape validation
//! - [`predicate`]: Parameter and return value predicates
//! - [`outcome`]: The result envelope of a guarded call
//! - [`violation`]: Runtime violations and the full violation taxonomy
//! - [`config`]: Configuration loading from `.warden/warden.json`
//! - [`hash`]: Deterministic source hashing (base62 of xxhash64)

pub mod config;
pub mod contract;
pub mod descriptor;
pub mod hash;
pub mod outcome;
pub mod predicate;
pub mod schema;
pub mod violation;

/// Caller identifier used for invocations that are not scoped to a function.
pub const MODULE_CALLER: &str = "<module>";
