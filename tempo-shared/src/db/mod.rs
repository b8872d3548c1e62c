/// Database utilities
///
/// - `pool`: PostgreSQL connection pool management
/// - `migrations`: Migration runner built on `sqlx::migrate!`

pub mod migrations;
pub mod pool;

pub use migrations::{ensure_database_exists, run_migrations};
pub use pool::{close_pool, create_pool, health_check, DatabaseConfig};
