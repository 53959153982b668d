use warden_auth::crypto::totp;
use warden_auth::domain::types::{User, ValidationCodeType};
use warden_auth::error::AuthServiceError;
use warden_auth::usecase::login::{LoginInput, LoginUseCase};

use crate::helpers::{
    MockDeviceRepo, MockRefreshTokenRepo, MockUserRepo, MockValidationCodeRepo, TEST_PASSWORD,
    current_totp, test_client, test_code, test_role, test_user, token_service,
};

const EMAIL: &str = "ada@example.com";

type Login =
    LoginUseCase<MockUserRepo, MockValidationCodeRepo, MockDeviceRepo, MockRefreshTokenRepo>;

fn login_usecase(user: User, codes: MockValidationCodeRepo) -> Login {
    let role = test_role("Client");
    let mut user = user;
    user.role_id = role.id;
    LoginUseCase {
        users: MockUserRepo::new(vec![user], vec![role]),
        codes,
        devices: MockDeviceRepo::default(),
        refresh_tokens: MockRefreshTokenRepo::default(),
        tokens: token_service(),
    }
}

fn input(password: &str, totp_code: Option<&str>, code: Option<&str>) -> LoginInput {
    LoginInput {
        email: EMAIL.to_owned(),
        password: password.to_owned(),
        totp_code: totp_code.map(str::to_owned),
        code: code.map(str::to_owned),
        client: test_client(),
    }
}

fn plain_user() -> User {
    test_user(EMAIL, &test_role("Client"))
}

fn two_factor_user() -> (User, String) {
    let setup = totp::generate("warden", EMAIL).unwrap();
    let mut user = plain_user();
    user.totp_secret = Some(setup.secret.clone());
    (user, setup.secret)
}

#[tokio::test]
async fn should_issue_pair_and_register_device() {
    let usecase = login_usecase(plain_user(), MockValidationCodeRepo::empty());
    let devices = usecase.devices.devices_handle();
    let records = usecase.refresh_tokens.records_handle();

    let pair = usecase
        .execute(input(TEST_PASSWORD, None, None))
        .await
        .unwrap();

    let claims = usecase.tokens.verify_access(&pair.access_token).unwrap();
    let devices = devices.lock().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(claims.device_id, devices[0].id);
    assert_eq!(claims.role_name, "Client");
    assert_eq!(devices[0].ip, test_client().ip);
    assert_eq!(devices[0].user_agent, test_client().user_agent);

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].token, pair.refresh_token);
    assert_eq!(records[0].device_id, devices[0].id);
}

#[tokio::test]
async fn should_open_new_device_per_login() {
    let usecase = login_usecase(plain_user(), MockValidationCodeRepo::empty());
    let devices = usecase.devices.devices_handle();

    let first = usecase.execute(input(TEST_PASSWORD, None, None)).await.unwrap();
    let second = usecase.execute(input(TEST_PASSWORD, None, None)).await.unwrap();

    assert_eq!(devices.lock().unwrap().len(), 2);
    assert_ne!(first.refresh_token, second.refresh_token);
}

#[tokio::test]
async fn should_reject_unknown_email() {
    let usecase = login_usecase(plain_user(), MockValidationCodeRepo::empty());
    let mut input = input(TEST_PASSWORD, None, None);
    input.email = "nobody@example.com".to_owned();

    let err = usecase.execute(input).await.unwrap_err();
    assert!(matches!(err, AuthServiceError::EmailNotFound));
}

#[tokio::test]
async fn should_reject_wrong_password_without_side_effects() {
    let usecase = login_usecase(plain_user(), MockValidationCodeRepo::empty());
    let devices = usecase.devices.devices_handle();

    let err = usecase
        .execute(input("not-the-password", None, None))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthServiceError::InvalidPassword));
    assert!(devices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_both_second_factors() {
    let usecase = login_usecase(plain_user(), MockValidationCodeRepo::empty());

    let err = usecase
        .execute(input(TEST_PASSWORD, Some("123456"), Some("654321")))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthServiceError::InvalidTotpAndCode));
}

#[tokio::test]
async fn should_require_second_factor_when_enabled() {
    let (user, _) = two_factor_user();
    let usecase = login_usecase(user, MockValidationCodeRepo::empty());

    let err = usecase
        .execute(input(TEST_PASSWORD, None, None))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthServiceError::InvalidTotpAndCode));
}

#[tokio::test]
async fn should_accept_current_totp_code() {
    let (user, secret) = two_factor_user();
    let usecase = login_usecase(user, MockValidationCodeRepo::empty());

    let code = current_totp(&secret);
    usecase
        .execute(input(TEST_PASSWORD, Some(&code), None))
        .await
        .unwrap();
}

#[tokio::test]
async fn should_reject_wrong_totp_code() {
    let (user, secret) = two_factor_user();
    let usecase = login_usecase(user, MockValidationCodeRepo::empty());

    let wrong = ["000000", "111111", "222222", "333333"]
        .into_iter()
        .find(|c| !totp::verify(&secret, c).unwrap())
        .unwrap();
    let err = usecase
        .execute(input(TEST_PASSWORD, Some(wrong), None))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthServiceError::InvalidTotpCode));
}

#[tokio::test]
async fn should_accept_emailed_login_code_as_second_factor() {
    let (user, _) = two_factor_user();
    let codes = MockValidationCodeRepo::new(vec![test_code(
        EMAIL,
        "424242",
        ValidationCodeType::Login,
    )]);
    let usecase = login_usecase(user, codes);

    usecase
        .execute(input(TEST_PASSWORD, None, Some("424242")))
        .await
        .unwrap();
}

#[tokio::test]
async fn should_reject_emailed_code_for_other_purpose() {
    let (user, _) = two_factor_user();
    let codes = MockValidationCodeRepo::new(vec![test_code(
        EMAIL,
        "424242",
        ValidationCodeType::Register,
    )]);
    let usecase = login_usecase(user, codes);

    let err = usecase
        .execute(input(TEST_PASSWORD, None, Some("424242")))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthServiceError::InvalidOtp));
}
