//! # Tempo API Server Library
//!
//! Core functionality for the Tempo API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Session auth, admin gate, security headers
//! - `reminder`: Background task-reminder dispatcher
//! - `routes`: API route handlers
//! - `uploads`: Attachment storage on disk

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod reminder;
pub mod routes;
pub mod uploads;
