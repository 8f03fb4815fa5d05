pub mod auth;

pub use auth::{authenticate_jwt, ensure_logged_in, ensure_tea_owner, AuthUser};
