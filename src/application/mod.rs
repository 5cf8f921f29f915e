//! Application services and the ports they depend on.

pub mod error;
pub mod posts;
pub mod repos;
pub mod suggestions;
