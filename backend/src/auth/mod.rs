//! Authentication module
//!
//! JWT-based authentication with argon2 password hashing.

mod extractor;
mod jwt;
mod password;

pub use extractor::AuthUser;
pub use jwt::{Claims, JwtService};
pub use password::PasswordService;
