//! Bearer-token authentication: HMAC-signed JWTs and argon2 password hashes.

pub mod jwt;
pub mod password;

pub use jwt::{decode_token, issue_token, Claims};
pub use password::{hash_password, verify_password};
