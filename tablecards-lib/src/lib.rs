//! Table cards client library
//!
//! An async client for a remote table-storage backend, plus a table service
//! that mirrors one table locally and keeps it in step with the server.

pub mod api;
pub mod auth;
pub mod error;
pub mod model;
pub mod service;
pub mod session;

mod client;

pub use client::*;
