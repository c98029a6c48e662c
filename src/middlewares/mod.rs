pub mod auth;
pub mod cors;

pub use auth::{AuthContext, AuthMiddleware, current_auth, require_admin};
pub use cors::create_cors;
