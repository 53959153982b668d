#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chrono::{Duration, Utc};
use totp_rs::{Algorithm, Secret, TOTP};
use uuid::Uuid;

use warden_auth::crypto::password::hash_password;
use warden_auth::domain::repository::{
    DeviceRepository, IdentityProvider, OtpMailer, RefreshTokenRepository, RoleRepository,
    UserRepository, ValidationCodeRepository,
};
use warden_auth::domain::types::{
    ClientInfo, Device, DeviceUpdate, HttpMethod, NewDevice, NewUser, OAuthProfile, OAuthTokens,
    Permission, RefreshTokenRecord, RefreshTokenWithOwner, Role, RoleGrant, RoleUpdate, User,
    UserWithRole, ValidationCode, ValidationCodeType,
};
use warden_auth::error::AuthServiceError;
use warden_auth::usecase::token::TokenService;

pub const TEST_ACCESS_SECRET: &str = "test-access-secret";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret";
pub const TEST_PASSWORD: &str = "hunter22";

pub fn token_service() -> TokenService {
    TokenService::new(TEST_ACCESS_SECRET, TEST_REFRESH_SECRET, 900, 3600)
}

pub fn test_client() -> ClientInfo {
    ClientInfo {
        user_agent: "Mozilla/5.0 (X11; Linux x86_64)".to_owned(),
        ip: "203.0.113.7".to_owned(),
    }
}

pub fn test_role(name: &str) -> Role {
    Role {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        description: format!("{name} role"),
        is_active: true,
    }
}

pub fn test_user(email: &str, role: &Role) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        name: "Test User".to_owned(),
        phone_number: "+10000000000".to_owned(),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        role_id: role.id,
        totp_secret: None,
        avatar: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_code(email: &str, code: &str, kind: ValidationCodeType) -> ValidationCode {
    let now = Utc::now();
    ValidationCode {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        code: code.to_owned(),
        kind,
        expires_at: now + Duration::minutes(5),
        created_at: now,
    }
}

pub fn expired_code(email: &str, code: &str, kind: ValidationCodeType) -> ValidationCode {
    let mut c = test_code(email, code, kind);
    c.expires_at = Utc::now() - Duration::seconds(1);
    c
}

/// Current authenticator code for a base32 secret.
pub fn current_totp(secret: &str) -> String {
    let bytes = Secret::Encoded(secret.to_owned()).to_bytes().unwrap();
    TOTP::new(Algorithm::SHA1, 6, 1, 30, bytes, None, String::new())
        .unwrap()
        .generate_current()
        .unwrap()
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    pub roles: Vec<Role>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>, roles: Vec<Role>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            roles,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![], vec![])
    }

    /// Returns a shared handle to the internal user list for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_with_role_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithRole>, AuthServiceError> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };
        let role = self
            .roles
            .iter()
            .find(|r| r.id == user.role_id)
            .cloned()
            .ok_or_else(|| anyhow!("user role missing"))?;
        Ok(Some(UserWithRole { user, role }))
    }

    async fn create(&self, user: &NewUser) -> Result<User, AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthServiceError::EmailAlreadyExists);
        }
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            name: user.name.clone(),
            phone_number: user.phone_number.clone(),
            password_hash: user.password_hash.clone(),
            role_id: user.role_id,
            totp_secret: None,
            avatar: user.avatar.clone(),
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update_password(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<(), AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or(AuthServiceError::UserNotFound)?;
        user.password_hash = password_hash.to_owned();
        Ok(())
    }

    async fn set_totp_secret(
        &self,
        id: Uuid,
        secret: Option<&str>,
    ) -> Result<(), AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AuthServiceError::UserNotFound)?;
        user.totp_secret = secret.map(str::to_owned);
        Ok(())
    }
}

// ── MockRoleRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockRoleRepo {
    pub roles: Arc<Mutex<Vec<Role>>>,
    pub permissions: Arc<Mutex<Vec<Permission>>>,
    /// `(role_id, permission_id)` pairs.
    pub grants: Arc<Mutex<Vec<(Uuid, Uuid)>>>,
    pub deleted: Arc<Mutex<Vec<Uuid>>>,
    pub deleted_permissions: Arc<Mutex<Vec<Uuid>>>,
    pub name_lookups: Arc<Mutex<u32>>,
}

impl MockRoleRepo {
    pub fn new(roles: Vec<Role>) -> Self {
        Self {
            roles: Arc::new(Mutex::new(roles)),
            permissions: Arc::new(Mutex::new(vec![])),
            grants: Arc::new(Mutex::new(vec![])),
            deleted: Arc::new(Mutex::new(vec![])),
            deleted_permissions: Arc::new(Mutex::new(vec![])),
            name_lookups: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a permission to the catalogue without granting it to anyone.
    pub fn add_permission(&self, method: HttpMethod, path: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.permissions.lock().unwrap().push(Permission {
            id,
            name: format!("{} {path}", method.as_str()),
            description: String::new(),
            path: path.to_owned(),
            method,
            module: "test".to_owned(),
        });
        id
    }

    pub fn grant(self, role_id: Uuid, method: HttpMethod, path: &str) -> Self {
        let permission_id = self.add_permission(method, path);
        self.grants.lock().unwrap().push((role_id, permission_id));
        self
    }

    pub fn soft_delete_permission(&self, permission_id: Uuid) {
        self.deleted_permissions.lock().unwrap().push(permission_id);
    }

    pub fn grants_handle(&self) -> Arc<Mutex<Vec<(Uuid, Uuid)>>> {
        Arc::clone(&self.grants)
    }

    pub fn deleted_handle(&self) -> Arc<Mutex<Vec<Uuid>>> {
        Arc::clone(&self.deleted)
    }

    pub fn name_lookups_handle(&self) -> Arc<Mutex<u32>> {
        Arc::clone(&self.name_lookups)
    }

    fn live(&self, id: Uuid) -> Option<Role> {
        if self.deleted.lock().unwrap().contains(&id) {
            return None;
        }
        self.roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }
}

impl RoleRepository for MockRoleRepo {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthServiceError> {
        *self.name_lookups.lock().unwrap() += 1;
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AuthServiceError> {
        Ok(self.live(id))
    }

    async fn find_active_grant(
        &self,
        role_id: Uuid,
        method: HttpMethod,
        path: &str,
    ) -> Result<Option<RoleGrant>, AuthServiceError> {
        let Some(role) = self.live(role_id).filter(|r| r.is_active) else {
            return Ok(None);
        };
        let granted: Vec<Uuid> = self
            .grants
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == role_id)
            .map(|(_, permission_id)| *permission_id)
            .collect();
        let deleted = self.deleted_permissions.lock().unwrap();
        let permissions = self
            .permissions
            .lock()
            .unwrap()
            .iter()
            .filter(|p| granted.contains(&p.id) && !deleted.contains(&p.id))
            .filter(|p| p.method == method && p.path == path)
            .cloned()
            .collect();
        Ok(Some(RoleGrant { role, permissions }))
    }

    async fn update(&self, id: Uuid, update: &RoleUpdate) -> Result<Role, AuthServiceError> {
        let mut roles = self.roles.lock().unwrap();
        let taken = update
            .name
            .as_ref()
            .is_some_and(|name| roles.iter().any(|r| r.id != id && &r.name == name));
        if taken {
            return Err(AuthServiceError::RoleAlreadyExists);
        }
        let role = roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AuthServiceError::RoleNotFound)?;
        if let Some(name) = &update.name {
            role.name = name.clone();
        }
        if let Some(description) = &update.description {
            role.description = description.clone();
        }
        if let Some(is_active) = update.is_active {
            role.is_active = is_active;
        }
        if let Some(permission_ids) = &update.permission_ids {
            let mut grants = self.grants.lock().unwrap();
            grants.retain(|(role_id, _)| *role_id != id);
            grants.extend(permission_ids.iter().map(|permission_id| (id, *permission_id)));
        }
        Ok(role.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), AuthServiceError> {
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }
}

// ── MockDeviceRepo ───────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockDeviceRepo {
    pub devices: Arc<Mutex<Vec<Device>>>,
}

impl MockDeviceRepo {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices: Arc::new(Mutex::new(devices)),
        }
    }

    pub fn devices_handle(&self) -> Arc<Mutex<Vec<Device>>> {
        Arc::clone(&self.devices)
    }
}

impl DeviceRepository for MockDeviceRepo {
    async fn create(&self, device: &NewDevice) -> Result<Device, AuthServiceError> {
        let now = Utc::now();
        let created = Device {
            id: Uuid::new_v4(),
            user_id: device.user_id,
            user_agent: device.user_agent.clone(),
            ip: device.ip.clone(),
            last_active: now,
            is_active: true,
            created_at: now,
        };
        self.devices.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, update: &DeviceUpdate) -> Result<Device, AuthServiceError> {
        let mut devices = self.devices.lock().unwrap();
        let device = devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| anyhow!("device {id} not found"))?;
        if let Some(ip) = &update.ip {
            device.ip = ip.clone();
        }
        if let Some(user_agent) = &update.user_agent {
            device.user_agent = user_agent.clone();
        }
        if let Some(is_active) = update.is_active {
            device.is_active = is_active;
        }
        device.last_active = Utc::now();
        Ok(device.clone())
    }
}

// ── MockRefreshTokenRepo ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockRefreshTokenRepo {
    pub records: Arc<Mutex<Vec<RefreshTokenRecord>>>,
    pub owners: Vec<UserWithRole>,
    /// Rows `find_with_owner` still sees but `delete` no longer finds,
    /// as if another request deleted them in between.
    pub stale: Arc<Mutex<Vec<RefreshTokenRecord>>>,
}

impl MockRefreshTokenRepo {
    pub fn new(owners: Vec<UserWithRole>) -> Self {
        Self {
            owners,
            ..Self::default()
        }
    }

    pub fn records_handle(&self) -> Arc<Mutex<Vec<RefreshTokenRecord>>> {
        Arc::clone(&self.records)
    }

    /// Move a live row into the stale set.
    pub fn race_on(&self, token: &str) {
        let mut records = self.records.lock().unwrap();
        if let Some(pos) = records.iter().position(|r| r.token == token) {
            let record = records.remove(pos);
            self.stale.lock().unwrap().push(record);
        }
    }
}

impl RefreshTokenRepository for MockRefreshTokenRepo {
    async fn create(&self, record: &RefreshTokenRecord) -> Result<(), AuthServiceError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn find_with_owner(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenWithOwner>, AuthServiceError> {
        let live = self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.token == token)
            .cloned();
        let record = live.or_else(|| {
            self.stale
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.token == token)
                .cloned()
        });
        let Some(record) = record else {
            return Ok(None);
        };
        let owner = self
            .owners
            .iter()
            .find(|o| o.user.id == record.user_id)
            .cloned()
            .ok_or_else(|| anyhow!("token owner missing"))?;
        Ok(Some(RefreshTokenWithOwner { record, owner }))
    }

    async fn delete(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthServiceError> {
        let mut records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .position(|r| r.token == token)
            .map(|pos| records.remove(pos)))
    }
}

// ── MockValidationCodeRepo ───────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockValidationCodeRepo {
    pub codes: Arc<Mutex<Vec<ValidationCode>>>,
}

impl MockValidationCodeRepo {
    pub fn new(codes: Vec<ValidationCode>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn codes_handle(&self) -> Arc<Mutex<Vec<ValidationCode>>> {
        Arc::clone(&self.codes)
    }
}

impl ValidationCodeRepository for MockValidationCodeRepo {
    async fn upsert(&self, code: &ValidationCode) -> Result<(), AuthServiceError> {
        let mut codes = self.codes.lock().unwrap();
        codes.retain(|c| !(c.email == code.email && c.kind == code.kind));
        codes.push(code.clone());
        Ok(())
    }

    async fn find(
        &self,
        email: &str,
        code: &str,
        kind: ValidationCodeType,
    ) -> Result<Option<ValidationCode>, AuthServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.email == email && c.code == code && c.kind == kind)
            .cloned())
    }

    async fn delete(
        &self,
        email: &str,
        code: &str,
        kind: ValidationCodeType,
    ) -> Result<bool, AuthServiceError> {
        let mut codes = self.codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|c| !(c.email == email && c.code == code && c.kind == kind));
        Ok(codes.len() < before)
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockMailer {
    /// `(email, code)` pairs delivered so far.
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl MockMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.sent)
    }
}

impl OtpMailer for MockMailer {
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), AuthServiceError> {
        if self.fail {
            return Err(AuthServiceError::FailedToSendOtp);
        }
        self.sent
            .lock()
            .unwrap()
            .push((email.to_owned(), code.to_owned()));
        Ok(())
    }
}

// ── MockIdentityProvider ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockIdentityProvider {
    pub profile: OAuthProfile,
    pub reject_code: bool,
}

impl MockIdentityProvider {
    pub fn with_profile(email: Option<&str>, name: Option<&str>) -> Self {
        Self {
            profile: OAuthProfile {
                email: email.map(str::to_owned),
                name: name.map(str::to_owned),
                picture: Some("https://example.com/avatar.png".to_owned()),
            },
            reject_code: false,
        }
    }
}

impl IdentityProvider for MockIdentityProvider {
    fn authorization_url(&self, state: &str) -> Result<String, AuthServiceError> {
        Ok(format!("https://idp.example.com/auth?state={state}"))
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, AuthServiceError> {
        if self.reject_code {
            return Err(AuthServiceError::IdentityProviderFailed);
        }
        Ok(OAuthTokens {
            access_token: format!("idp-token-for-{code}"),
            id_token: None,
        })
    }

    async fn fetch_profile(&self, _tokens: &OAuthTokens) -> Result<OAuthProfile, AuthServiceError> {
        Ok(self.profile.clone())
    }
}
