/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for access tokens. Env var: `ACCESS_TOKEN_SECRET`.
    pub access_token_secret: String,
    /// HMAC secret for refresh tokens. Env var: `REFRESH_TOKEN_SECRET`.
    pub refresh_token_secret: String,
    /// Access token lifetime in seconds (default 900).
    pub access_token_ttl_secs: u64,
    /// Refresh token lifetime in seconds (default 30 days).
    pub refresh_token_ttl_secs: u64,
    /// Emailed one-time code lifetime in seconds (default 300).
    pub otp_ttl_secs: i64,
    /// Shared secret checked by the API-key guard. Env var: `SECRET_API_KEY`.
    pub secret_api_key: String,
    /// TOTP issuer label shown by authenticator apps (default "warden").
    pub app_name: String,
    /// TCP port to listen on (default 3112). Env var: `AUTH_PORT`.
    pub auth_port: u16,
    /// Resend API key for outbound OTP mail.
    pub resend_api_key: String,
    /// Sender address for OTP mail (e.g. "Warden <no-reply@example.com>").
    pub mail_from: String,
    /// Timeout applied to every outbound HTTP call (default 10).
    pub outbound_timeout_secs: u64,
    pub google_client_id: String,
    pub google_client_secret: String,
    /// Callback registered with Google (points at `/auth/google-callback`).
    pub google_redirect_uri: String,
    /// Frontend URL the callback redirects to with tokens or an error.
    pub google_client_redirect_uri: String,
}

fn var_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            access_token_secret: std::env::var("ACCESS_TOKEN_SECRET")
                .expect("ACCESS_TOKEN_SECRET"),
            refresh_token_secret: std::env::var("REFRESH_TOKEN_SECRET")
                .expect("REFRESH_TOKEN_SECRET"),
            access_token_ttl_secs: var_or("ACCESS_TOKEN_TTL_SECS", 900),
            refresh_token_ttl_secs: var_or("REFRESH_TOKEN_TTL_SECS", 2_592_000),
            otp_ttl_secs: var_or("OTP_TTL_SECS", 300),
            secret_api_key: std::env::var("SECRET_API_KEY").expect("SECRET_API_KEY"),
            app_name: std::env::var("APP_NAME").unwrap_or_else(|_| "warden".to_owned()),
            auth_port: var_or("AUTH_PORT", 3112),
            resend_api_key: std::env::var("RESEND_API_KEY").expect("RESEND_API_KEY"),
            mail_from: std::env::var("MAIL_FROM").expect("MAIL_FROM"),
            outbound_timeout_secs: var_or("OUTBOUND_TIMEOUT_SECS", 10),
            google_client_id: std::env::var("GOOGLE_CLIENT_ID").expect("GOOGLE_CLIENT_ID"),
            google_client_secret: std::env::var("GOOGLE_CLIENT_SECRET")
                .expect("GOOGLE_CLIENT_SECRET"),
            google_redirect_uri: std::env::var("GOOGLE_REDIRECT_URI")
                .expect("GOOGLE_REDIRECT_URI"),
            google_client_redirect_uri: std::env::var("GOOGLE_CLIENT_REDIRECT_URI")
                .expect("GOOGLE_CLIENT_REDIRECT_URI"),
        }
    }
}
