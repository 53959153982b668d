use warden_auth::crypto::password::verify_password;
use warden_auth::error::AuthServiceError;
use warden_auth::usecase::google::{
    GoogleCallbackInput, GoogleCallbackUseCase, GoogleLinkUseCase, decode_state, encode_state,
};
use warden_auth::usecase::role::ClientRoleCache;

use crate::helpers::{
    MockDeviceRepo, MockIdentityProvider, MockRefreshTokenRepo, MockRoleRepo, MockUserRepo,
    TEST_PASSWORD, test_client, test_role, test_user, token_service,
};

type Callback = GoogleCallbackUseCase<
    MockIdentityProvider,
    MockUserRepo,
    MockRoleRepo,
    MockDeviceRepo,
    MockRefreshTokenRepo,
>;

fn callback(provider: MockIdentityProvider, users: MockUserRepo, roles: MockRoleRepo) -> Callback {
    GoogleCallbackUseCase {
        provider,
        users,
        roles,
        devices: MockDeviceRepo::default(),
        refresh_tokens: MockRefreshTokenRepo::default(),
        tokens: token_service(),
        client_role: ClientRoleCache::new(),
    }
}

fn input() -> GoogleCallbackInput {
    GoogleCallbackInput {
        code: "auth-code".to_owned(),
        state: encode_state(&test_client()).unwrap(),
    }
}

#[test]
fn should_carry_client_fingerprint_in_link_state() {
    let url = GoogleLinkUseCase {
        provider: MockIdentityProvider::default(),
    }
    .execute(&test_client())
    .unwrap();

    let state = url.split("state=").nth(1).unwrap();
    assert_eq!(decode_state(state), test_client());
}

#[tokio::test]
async fn should_create_client_account_on_first_google_login() {
    let client_role = test_role("Client");
    let users = MockUserRepo::empty();
    let stored = users.users_handle();
    let usecase = callback(
        MockIdentityProvider::with_profile(Some("g@example.com"), Some("Grace")),
        users,
        MockRoleRepo::new(vec![client_role.clone()]),
    );
    let devices = usecase.devices.devices_handle();

    let pair = usecase.execute(input()).await.unwrap();

    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].email, "g@example.com");
    assert_eq!(stored[0].name, "Grace");
    assert_eq!(stored[0].role_id, client_role.id);
    assert_eq!(
        stored[0].avatar.as_deref(),
        Some("https://example.com/avatar.png")
    );

    let claims = usecase.tokens.verify_access(&pair.access_token).unwrap();
    assert_eq!(claims.user_id, stored[0].id);
    assert_eq!(claims.role_name, "Client");
    assert_eq!(devices.lock().unwrap()[0].ip, test_client().ip);
}

#[tokio::test]
async fn should_default_display_name_when_profile_has_none() {
    let users = MockUserRepo::empty();
    let stored = users.users_handle();
    let usecase = callback(
        MockIdentityProvider::with_profile(Some("g@example.com"), None),
        users,
        MockRoleRepo::new(vec![test_role("Client")]),
    );

    usecase.execute(input()).await.unwrap();

    assert_eq!(stored.lock().unwrap()[0].name, "Google User");
}

#[tokio::test]
async fn should_sign_in_existing_account_without_touching_it() {
    let admin = test_role("Admin");
    let existing = test_user("g@example.com", &admin);
    let users = MockUserRepo::new(vec![existing.clone()], vec![admin.clone()]);
    let stored = users.users_handle();
    let usecase = callback(
        MockIdentityProvider::with_profile(Some("g@example.com"), Some("Grace")),
        users,
        MockRoleRepo::new(vec![admin]),
    );

    let pair = usecase.execute(input()).await.unwrap();

    let claims = usecase.tokens.verify_access(&pair.access_token).unwrap();
    assert_eq!(claims.user_id, existing.id);
    assert_eq!(claims.role_name, "Admin");

    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert!(verify_password(TEST_PASSWORD, &stored[0].password_hash).unwrap());
}

#[tokio::test]
async fn should_fail_when_profile_has_no_email() {
    let usecase = callback(
        MockIdentityProvider::with_profile(None, Some("Grace")),
        MockUserRepo::empty(),
        MockRoleRepo::new(vec![test_role("Client")]),
    );

    let err = usecase.execute(input()).await.unwrap_err();
    assert!(matches!(err, AuthServiceError::IdentityProviderFailed));
}

#[tokio::test]
async fn should_fail_when_code_exchange_is_rejected() {
    let mut provider = MockIdentityProvider::with_profile(Some("g@example.com"), None);
    provider.reject_code = true;
    let users = MockUserRepo::empty();
    let stored = users.users_handle();
    let usecase = callback(provider, users, MockRoleRepo::new(vec![test_role("Client")]));

    let err = usecase.execute(input()).await.unwrap_err();

    assert!(matches!(err, AuthServiceError::IdentityProviderFailed));
    assert!(stored.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_fall_back_to_unknown_fingerprint_for_bad_state() {
    let usecase = callback(
        MockIdentityProvider::with_profile(Some("g@example.com"), None),
        MockUserRepo::empty(),
        MockRoleRepo::new(vec![test_role("Client")]),
    );
    let devices = usecase.devices.devices_handle();

    usecase
        .execute(GoogleCallbackInput {
            code: "auth-code".to_owned(),
            state: "not-a-state".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(devices.lock().unwrap()[0].ip, "unknown");
}
