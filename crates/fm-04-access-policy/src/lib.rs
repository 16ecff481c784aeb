//! # Access Policy (fm-04)
//!
//! Who may call what.
//!
//! ## Access Levels
//!
//! | Level | Minimum role | Used for |
//! |-------|--------------|----------|
//! | `Authenticated` | operator | reads, charge updates, environmental logs |
//! | `Manager` | manager | creates and edits |
//! | `Admin` | admin | deletes, user directory |
//!
//! Credentials are HMAC-signed JWTs carrying `sub`, `name`, `role` and
//! `exp`. Verification yields a [`Caller`]; [`authorize`] checks the
//! caller's role against an [`AccessLevel`]. Token issuance exists for
//! tooling and tests; login itself is handled elsewhere.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::jwt::{JwtCodec, JwtSettings, DEV_JWT_SECRET};
pub use domain::access::{authorize, AccessLevel};
pub use domain::caller::{Caller, Claims};
pub use domain::commands::{NewUser, ProfilePatch, UserPatch};
pub use domain::errors::AuthError;
pub use ports::inbound::{TokenVerifier, UserDirectoryApi};
pub use service::{UserDirectoryDependencies, UserDirectoryService};
