//! `toplist-auth` — authentication boundary (verified identity only).
//!
//! Token *issuance* (registration, login, sessions) is owned by the external
//! identity provider; this crate only turns a presented credential into a
//! verified `(user id, username)` identity. Intentionally decoupled from HTTP
//! and storage.

pub mod claims;
pub mod jwt;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
