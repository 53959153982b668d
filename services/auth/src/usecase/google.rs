use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use uuid::Uuid;

use warden_auth_types::identity::AuthContext;

use crate::crypto::password::hash_password;
use crate::domain::repository::{
    DeviceRepository, IdentityProvider, RefreshTokenRepository, RoleRepository, UserRepository,
};
use crate::domain::types::{ClientInfo, NewDevice, NewUser, ROLE_CLIENT, TokenPair};
use crate::error::AuthServiceError;
use crate::usecase::role::ClientRoleCache;
use crate::usecase::token::{TokenService, issue_token_pair};

const DEFAULT_DISPLAY_NAME: &str = "Google User";

/// Pack the caller's fingerprint into the OAuth `state` parameter.
pub fn encode_state(client: &ClientInfo) -> Result<String, AuthServiceError> {
    let json = serde_json::to_vec(client).map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Unpack `state`. Anything unreadable degrades to an "unknown" fingerprint
/// rather than failing the login.
pub fn decode_state(state: &str) -> ClientInfo {
    let decoded = URL_SAFE_NO_PAD
        .decode(state)
        .map_err(anyhow::Error::from)
        .and_then(|bytes| serde_json::from_slice::<ClientInfo>(&bytes).map_err(Into::into));
    match decoded {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable oauth state");
            ClientInfo::unknown()
        }
    }
}

// ── GoogleLink ───────────────────────────────────────────────────────────────

pub struct GoogleLinkUseCase<P: IdentityProvider> {
    pub provider: P,
}

impl<P: IdentityProvider> GoogleLinkUseCase<P> {
    pub fn execute(&self, client: &ClientInfo) -> Result<String, AuthServiceError> {
        self.provider.authorization_url(&encode_state(client)?)
    }
}

// ── GoogleCallback ───────────────────────────────────────────────────────────

pub struct GoogleCallbackInput {
    pub code: String,
    pub state: String,
}

pub struct GoogleCallbackUseCase<P, U, R, D, T>
where
    P: IdentityProvider,
    U: UserRepository,
    R: RoleRepository,
    D: DeviceRepository,
    T: RefreshTokenRepository,
{
    pub provider: P,
    pub users: U,
    pub roles: R,
    pub devices: D,
    pub refresh_tokens: T,
    pub tokens: TokenService,
    pub client_role: ClientRoleCache,
}

impl<P, U, R, D, T> GoogleCallbackUseCase<P, U, R, D, T>
where
    P: IdentityProvider,
    U: UserRepository,
    R: RoleRepository,
    D: DeviceRepository,
    T: RefreshTokenRepository,
{
    pub async fn execute(&self, input: GoogleCallbackInput) -> Result<TokenPair, AuthServiceError> {
        let client = decode_state(&input.state);

        // 1. Code → tokens → profile
        let oauth = self.provider.exchange_code(&input.code).await?;
        let profile = self.provider.fetch_profile(&oauth).await?;
        let Some(email) = profile.email else {
            tracing::warn!("identity provider profile has no email");
            return Err(AuthServiceError::IdentityProviderFailed);
        };

        // 2. Find or create the account
        let existing = self.users.find_with_role_by_email(&email).await?;
        let (user_id, role_id, role_name) = match existing {
            Some(found) => (found.user.id, found.role.id, found.role.name),
            None => {
                let role_id = self.client_role.get(&self.roles).await?;
                let password_hash = hash_password(&Uuid::new_v4().to_string())?;
                let user = self
                    .users
                    .create(&NewUser {
                        email,
                        name: profile
                            .name
                            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_owned()),
                        phone_number: String::new(),
                        password_hash,
                        role_id,
                        avatar: profile.picture,
                    })
                    .await?;
                tracing::info!(user_id = %user.id, "user registered via google");
                (user.id, role_id, ROLE_CLIENT.to_owned())
            }
        };

        // 3. New session
        let device = self
            .devices
            .create(&NewDevice {
                user_id,
                user_agent: client.user_agent,
                ip: client.ip,
            })
            .await?;

        let ctx = AuthContext {
            user_id,
            device_id: device.id,
            role_id,
            role_name,
        };
        issue_token_pair(&self.tokens, &self.refresh_tokens, &ctx).await
    }
}
