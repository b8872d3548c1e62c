/// Middleware modules for the API server
///
/// - `session`: Cookie session authentication and the admin gate
/// - `security`: Security response headers

pub mod security;
pub mod session;
