//! sea-orm entities for the auth service.

pub mod devices;
pub mod permissions;
pub mod refresh_tokens;
pub mod role_permissions;
pub mod roles;
pub mod users;
pub mod validation_codes;
