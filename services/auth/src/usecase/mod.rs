pub mod google;
pub mod login;
pub mod otp;
pub mod password;
pub mod register;
pub mod role;
pub mod session;
pub mod token;
pub mod two_factor;
