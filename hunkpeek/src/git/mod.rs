//! Git integration for hunkpeek.
//!
//! The git module exposes a `GitClient` facade that owns a background
//! `std::thread` holding the `git2::Repository` for its lifetime. Repository
//! is !Send, so it never crosses a thread boundary.
pub mod client;
pub mod types;
pub mod worker;

pub use client::GitClient;
