/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Liveness probe
/// - `auth`: Google sign-in, current user, logout
/// - `users`: Profile and login history
/// - `tasks`: Personal timeline tasks
/// - `labels`: Label catalog
/// - `projects`: Boards, columns, board tasks, members, comments
/// - `admin`: User management, statistics, system configuration

pub mod admin;
pub mod auth;
pub mod health;
pub mod labels;
pub mod projects;
pub mod tasks;
pub mod users;
