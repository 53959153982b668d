pub mod auth;
pub mod client;
pub mod google;
pub mod role;
pub mod two_factor;
