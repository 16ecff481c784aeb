//! # Fleet-Manager Test Suite
//!
//! Unified test crate for behavior that spans more than one subsystem.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── support.rs     # Shared fixtures: wired container, clock, HTTP client
//!     ├── scenarios.rs   # Lifecycle scenarios through the service ports
//!     ├── http_api.rs    # REST contract through the assembled router
//!     └── properties.rs  # Property tests over bounds and audit trails
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p fleet-tests
//!
//! # By category
//! cargo test -p fleet-tests integration::scenarios::
//! cargo test -p fleet-tests integration::http_api::
//! cargo test -p fleet-tests integration::properties::
//! ```

pub mod integration;
