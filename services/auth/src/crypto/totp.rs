//! RFC 6238 codes: SHA-1, 6 digits, 30 s step, one step of skew either side.

use anyhow::anyhow;
use totp_rs::{Algorithm, Secret, TOTP};

use crate::domain::types::TotpSetup;
use crate::error::AuthServiceError;

const DIGITS: usize = 6;
const SKEW: u8 = 1;
const STEP: u64 = 30;

fn build(
    secret: Vec<u8>,
    issuer: Option<String>,
    account: String,
) -> Result<TOTP, AuthServiceError> {
    TOTP::new(Algorithm::SHA1, DIGITS, SKEW, STEP, secret, issuer, account)
        .map_err(|e| AuthServiceError::Internal(anyhow!("build totp: {e}")))
}

/// Fresh base32 secret plus the `otpauth://` URI an authenticator app scans.
pub fn generate(issuer: &str, account: &str) -> Result<TotpSetup, AuthServiceError> {
    let secret = Secret::generate_secret();
    let bytes = secret
        .to_bytes()
        .map_err(|e| AuthServiceError::Internal(anyhow!("totp secret bytes: {e}")))?;
    let totp = build(bytes, Some(issuer.to_owned()), account.to_owned())?;

    Ok(TotpSetup {
        secret: secret.to_encoded().to_string(),
        uri: totp.get_url(),
    })
}

/// Check `code` against a stored base32 secret for the current time window.
pub fn verify(secret_base32: &str, code: &str) -> Result<bool, AuthServiceError> {
    let bytes = Secret::Encoded(secret_base32.to_owned())
        .to_bytes()
        .map_err(|e| AuthServiceError::Internal(anyhow!("decode totp secret: {e}")))?;
    build(bytes, None, String::new())?
        .check_current(code)
        .map_err(|e| AuthServiceError::Internal(anyhow!("totp clock: {e}")))
}
