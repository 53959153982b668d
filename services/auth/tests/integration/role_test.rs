use uuid::Uuid;

use warden_auth::domain::types::RoleUpdate;
use warden_auth::domain::repository::RoleRepository;
use warden_auth::error::AuthServiceError;
use warden_auth::usecase::role::{DeleteRoleUseCase, UpdateRoleUseCase};

use crate::helpers::{MockRoleRepo, test_role};

// ── Update ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_custom_role() {
    let moderator = test_role("Moderator");
    let usecase = UpdateRoleUseCase {
        roles: MockRoleRepo::new(vec![moderator.clone()]),
    };

    let updated = usecase
        .execute(
            moderator.id,
            RoleUpdate {
                name: Some("Reviewer".to_owned()),
                is_active: Some(false),
                ..RoleUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Reviewer");
    assert!(!updated.is_active);
    assert_eq!(updated.description, moderator.description);
}

#[tokio::test]
async fn should_refuse_renaming_protected_role() {
    let admin = test_role("Admin");
    let err = UpdateRoleUseCase {
        roles: MockRoleRepo::new(vec![admin.clone()]),
    }
    .execute(
        admin.id,
        RoleUpdate {
            name: Some("Root".to_owned()),
            ..RoleUpdate::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AuthServiceError::RoleIsProtected));
}

#[tokio::test]
async fn should_refuse_deactivating_protected_role() {
    let client = test_role("Client");
    let err = UpdateRoleUseCase {
        roles: MockRoleRepo::new(vec![client.clone()]),
    }
    .execute(
        client.id,
        RoleUpdate {
            is_active: Some(false),
            ..RoleUpdate::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AuthServiceError::RoleIsProtected));
}

#[tokio::test]
async fn should_refuse_description_change_on_protected_role() {
    let seller = test_role("Seller");
    let roles = MockRoleRepo::new(vec![seller.clone()]);
    let err = UpdateRoleUseCase {
        roles: roles.clone(),
    }
    .execute(
        seller.id,
        RoleUpdate {
            name: Some("Seller".to_owned()),
            description: Some("Sells things".to_owned()),
            permission_ids: Some(vec![Uuid::new_v4()]),
            ..RoleUpdate::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AuthServiceError::RoleIsProtected));
    let stored = roles.find_by_id(seller.id).await.unwrap().unwrap();
    assert_eq!(stored.description, seller.description);
}

#[tokio::test]
async fn should_surface_duplicate_role_name() {
    let moderator = test_role("Moderator");
    let err = UpdateRoleUseCase {
        roles: MockRoleRepo::new(vec![moderator.clone(), test_role("Reviewer")]),
    }
    .execute(
        moderator.id,
        RoleUpdate {
            name: Some("Reviewer".to_owned()),
            ..RoleUpdate::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AuthServiceError::RoleAlreadyExists));
}

#[tokio::test]
async fn should_report_missing_role_on_update() {
    let err = UpdateRoleUseCase {
        roles: MockRoleRepo::new(vec![]),
    }
    .execute(Uuid::new_v4(), RoleUpdate::default())
    .await
    .unwrap_err();

    assert!(matches!(err, AuthServiceError::RoleNotFound));
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_soft_delete_custom_role() {
    let moderator = test_role("Moderator");
    let roles = MockRoleRepo::new(vec![moderator.clone()]);
    let deleted = roles.deleted_handle();
    let usecase = DeleteRoleUseCase { roles };

    usecase.execute(moderator.id).await.unwrap();

    assert_eq!(deleted.lock().unwrap().as_slice(), &[moderator.id]);
    let err = usecase.execute(moderator.id).await.unwrap_err();
    assert!(matches!(err, AuthServiceError::RoleNotFound));
}

#[tokio::test]
async fn should_refuse_deleting_protected_roles() {
    for name in ["Admin", "Client", "Seller"] {
        let role = test_role(name);
        let roles = MockRoleRepo::new(vec![role.clone()]);
        let deleted = roles.deleted_handle();

        let err = DeleteRoleUseCase { roles }
            .execute(role.id)
            .await
            .unwrap_err();

        assert!(matches!(err, AuthServiceError::RoleIsProtected));
        assert!(deleted.lock().unwrap().is_empty());
    }
}
