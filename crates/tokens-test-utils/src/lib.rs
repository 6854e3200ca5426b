//! Shared test utilities for the token-bridge workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`repo`]: [`TokenRepo`](repo::TokenRepo) builder for token repository layouts
//! - [`fixtures`]: canned token files for common layouts

pub mod fixtures;
pub mod repo;
