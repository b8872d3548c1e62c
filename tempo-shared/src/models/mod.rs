/// Database models
///
/// One module per aggregate:
///
/// - `user`: user accounts and the admin user listing
/// - `login_history`: append-only sign-in audit log
/// - `label`: the shared label catalog
/// - `task`: personal time-boxed tasks and the time-slot derivation
/// - `project`: projects and their member list
/// - `column`: Kanban columns
/// - `project_task`: tasks on a project board (subtasks, comments, attachments)
/// - `system_config`: the lazily-created configuration singleton

pub mod column;
pub mod label;
pub mod login_history;
pub mod project;
pub mod project_task;
pub mod system_config;
pub mod task;
pub mod user;
