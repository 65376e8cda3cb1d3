//! Authentication primitives.
//!
//! - [`jwt`] -- HS256 access-token validation (and generation for tests and
//!   dev tooling; token issuance is otherwise external).

pub mod jwt;
