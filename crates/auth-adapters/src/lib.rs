//! hobbylog/crates/auth-adapters/src/lib.rs
//!
//! The session authority: argon2 credential hashing and, behind the
//! `auth-jwt` feature, HS256 session tokens plus the `SessionGateway`
//! implementation the binary wires in.

pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod gateway;
#[cfg(feature = "auth-jwt")]
pub mod token;

pub use password::ArgonPasswordHasher;

#[cfg(feature = "auth-jwt")]
pub use gateway::JwtSessionGateway;
#[cfg(feature = "auth-jwt")]
pub use token::JwtTokenCodec;
