//! Auth types shared across Warden services.
//!
//! Provides JWT claim shapes and validation, bearer-header parsing, and the
//! `AuthContext` extractor downstream handlers use to read the caller.

pub mod bearer;
pub mod identity;
pub mod token;
