pub mod password;
pub mod totp;

use rand::RngExt;

use crate::domain::types::OTP_LEN;

/// Fixed-length numeric one-time code, zero padded.
pub fn generate_otp_code() -> String {
    let mut rng = rand::rng();
    (0..OTP_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}
