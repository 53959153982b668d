use serde::Serialize;

use crate::domain::repository::OtpMailer;
use crate::error::AuthServiceError;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Serialize)]
struct SendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

/// OTP delivery through the Resend HTTP API.
///
/// The request timeout comes from the shared `reqwest::Client`.
#[derive(Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
    endpoint: String,
}

impl ResendMailer {
    pub fn new(client: reqwest::Client, api_key: String, from: String) -> Self {
        Self {
            client,
            api_key,
            from,
            endpoint: RESEND_ENDPOINT.to_owned(),
        }
    }
}

fn otp_html(code: &str) -> String {
    format!(
        "<p>Your verification code is</p>\
         <p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{code}</p>\
         <p>If you did not request this code, ignore this email.</p>"
    )
}

impl OtpMailer for ResendMailer {
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), AuthServiceError> {
        let body = SendEmail {
            from: &self.from,
            to: [email],
            subject: "Your verification code",
            html: otp_html(code),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "otp mail request failed");
                AuthServiceError::FailedToSendOtp
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%status, "otp mail rejected by relay");
            return Err(AuthServiceError::FailedToSendOtp);
        }
        Ok(())
    }
}
