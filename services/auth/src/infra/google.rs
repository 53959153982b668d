use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::domain::repository::IdentityProvider;
use crate::domain::types::{OAuthProfile, OAuthTokens};
use crate::error::AuthServiceError;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const SCOPES: &str = "https://www.googleapis.com/auth/userinfo.email \
                      https://www.googleapis.com/auth/userinfo.profile";

fn upstream(step: &'static str) -> impl FnOnce(reqwest::Error) -> AuthServiceError {
    move |e| {
        tracing::warn!(error = %e, step, "google oauth call failed");
        AuthServiceError::IdentityProviderFailed
    }
}

/// Google OAuth 2.0 authorization-code flow.
#[derive(Clone)]
pub struct GoogleIdentityProvider {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GoogleIdentityProvider {
    pub fn new(
        client: reqwest::Client,
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    ) -> Self {
        Self {
            client,
            client_id,
            client_secret,
            redirect_uri,
        }
    }
}

impl IdentityProvider for GoogleIdentityProvider {
    fn authorization_url(&self, state: &str) -> Result<String, AuthServiceError> {
        let url = Url::parse_with_params(
            AUTH_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("access_type", "offline"),
                ("include_granted_scopes", "true"),
                ("state", state),
            ],
        )
        .map_err(|e| AuthServiceError::Internal(e.into()))?;
        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, AuthServiceError> {
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("code", code)
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", &self.client_secret)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("grant_type", "authorization_code")
            .finish();

        self.client
            .post(TOKEN_URL)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(upstream("token exchange"))?
            .json::<OAuthTokens>()
            .await
            .map_err(upstream("token exchange body"))
    }

    async fn fetch_profile(&self, tokens: &OAuthTokens) -> Result<OAuthProfile, AuthServiceError> {
        self.client
            .get(USERINFO_URL)
            .bearer_auth(&tokens.access_token)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(upstream("userinfo"))?
            .json::<OAuthProfile>()
            .await
            .map_err(upstream("userinfo body"))
    }
}
