// Library root: re-exports all modules so integration tests and the
// command-line front end can access the crate's public API.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod store;
pub mod synergy;
pub mod team;

pub use error::{Result, TeamError};
