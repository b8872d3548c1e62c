/// Authentication and authorization
///
/// - `jwt`: stateless session tokens (HS256, 7 days)
/// - `google`: Google ID-token verification via JWKS
/// - `authorization`: per-project access resolution

pub mod authorization;
pub mod google;
pub mod jwt;

pub use authorization::{require_editor, require_member, AuthzError, ProjectAccess};
pub use google::{GoogleAuthError, GoogleProfile, GoogleTokenVerifier};
pub use jwt::{create_token, validate_token, JwtError, SessionClaims};
