//! Client library for the Engine Yard Cloud API.
//!
//! The layers, from the bottom up:
//!
//! - `token_store`: API tokens persisted per endpoint in `~/.eyrc`
//! - `transport`: one HTTP round trip, classified into JSON or an `ApiError`
//! - `api`: the `ApiClient` and the `Session` shared with every record
//! - `model`: applications, environments, instances, keys and logs, with
//!   lazily fetched, memoized relations
//! - `collection`: ordered record lists searchable by partial name
//!
//! `commands` and `actions` build the `ey` command line on top of these.

pub mod actions;
pub mod api;
pub mod auth;
pub mod collection;
pub mod commands;
pub mod configuration;
pub mod error;
pub mod exit_codes;
pub mod memo;
pub mod model;
pub mod prompt;
pub mod token_store;
pub mod transport;

pub use api::{ApiClient, Session};
pub use collection::{Match, SmartCollection};
pub use error::ApiError;
