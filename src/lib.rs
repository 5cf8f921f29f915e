//! Blogify: a small blog publishing server.
//!
//! The crate is split the usual way: `domain` holds the post model and the
//! suggestion prompt/parsing rules, `application` holds the ports and services,
//! and `infra` wires SQLite, the completion service and the HTTP surface.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
