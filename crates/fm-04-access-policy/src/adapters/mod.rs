//! # Adapters
//!
//! - `jwt`: HMAC JWT issue/verify via `jsonwebtoken`.

pub mod jwt;
