//! # Tempo Shared Library
//!
//! This crate contains the types, database models, and business logic shared
//! by the Tempo API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and CRUD operations
//! - `auth`: Google sign-in verification, session tokens, project authorization
//! - `db`: Connection pool and migration runner
//! - `email`: Outbound notification mailer

pub mod auth;
pub mod db;
pub mod email;
pub mod models;

/// Current version of the Tempo shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
