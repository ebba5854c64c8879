//! Tests for the account service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    BlobStoreError, MockBlobStore, MockCourseRepository, MockFeedbackRepository,
    MockPasswordHasher, MockUserRepository, UserPersistenceError,
};
use crate::domain::service_test_helpers::{admin, fixture_clock, repositories, student, test_now};
use crate::domain::{ErrorCode, PasswordHash};

fn make_service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    blobs: MockBlobStore,
) -> AccountService {
    AccountService::new(
        repositories(
            users,
            MockCourseRepository::new(),
            MockFeedbackRepository::new(),
        ),
        Arc::new(hasher),
        Arc::new(blobs),
        fixture_clock(),
    )
}

fn credentials(email: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(email, "Student123!").expect("credentials")
}

fn users_returning(user: Option<User>) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(user));
    users
}

fn hasher_verifying(result: bool) -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().times(1).return_const(Ok(result));
    hasher
}

fn users_finding(user: User) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(user)));
    users
}

#[tokio::test]
async fn login_returns_profile_for_valid_credentials() {
    let jane = student();
    let expected = jane.profile();
    let service = make_service(
        users_returning(Some(jane)),
        hasher_verifying(true),
        MockBlobStore::new(),
    );

    let profile = service
        .authenticate(&credentials("Jane@Example.com"), LoginScope::Any)
        .await
        .expect("login succeeds");

    assert_eq!(profile, expected);
}

#[tokio::test]
async fn login_rejects_unknown_email_without_hashing() {
    let service = make_service(
        users_returning(None),
        MockPasswordHasher::new(),
        MockBlobStore::new(),
    );

    let error = service
        .authenticate(&credentials("ghost@example.com"), LoginScope::Any)
        .await
        .expect_err("unknown email");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "Invalid credentials");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let service = make_service(
        users_returning(Some(student())),
        hasher_verifying(false),
        MockBlobStore::new(),
    );

    let error = service
        .authenticate(&credentials("jane@example.com"), LoginScope::Any)
        .await
        .expect_err("wrong password");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn blocked_account_is_forbidden_after_password_check() {
    let mut jane = student();
    jane.is_blocked = true;
    let service = make_service(
        users_returning(Some(jane)),
        hasher_verifying(true),
        MockBlobStore::new(),
    );

    let error = service
        .authenticate(&credentials("jane@example.com"), LoginScope::Any)
        .await
        .expect_err("blocked");

    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.message(), "Your account has been blocked");
}

#[rstest]
#[case(Role::Student, Some("Invalid admin credentials"))]
#[case(Role::Admin, None)]
#[tokio::test]
async fn admin_login_only_accepts_admins(#[case] role: Role, #[case] failure: Option<&str>) {
    let user = if role == Role::Admin { admin() } else { student() };
    let hasher = if failure.is_none() {
        hasher_verifying(true)
    } else {
        MockPasswordHasher::new()
    };
    let service = make_service(users_returning(Some(user)), hasher, MockBlobStore::new());

    let result = service
        .authenticate(&credentials("someone@example.com"), LoginScope::AdminOnly)
        .await;

    match failure {
        Some(message) => {
            let error = result.expect_err("student refused");
            assert_eq!(error.code(), ErrorCode::Unauthorized);
            assert_eq!(error.message(), message);
        }
        None => assert_eq!(result.expect("admin accepted").role, Role::Admin),
    }
}

#[tokio::test]
async fn register_hashes_password_and_stores_student() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user: &User| {
            user.role == Role::Student
                && user.email.as_ref() == "jane@example.com"
                && user.password_hash.as_str() == "$argon2id$new"
                && user.created_at == test_now()
        })
        .times(1)
        .return_once(|_| Ok(()));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Ok(PasswordHash::new("$argon2id$new")));
    let service = make_service(users, hasher, MockBlobStore::new());

    let profile = service
        .register(&Registration {
            name: "Jane Smith".to_owned(),
            email: "JANE@example.com".to_owned(),
            password: "Student123!".to_owned(),
        })
        .await
        .expect("registration succeeds");

    assert_eq!(profile.role, Role::Student);
    assert!(!profile.is_blocked);
}

#[tokio::test]
async fn register_reports_duplicate_email_as_conflict() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::duplicate_email("jane@example.com")));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Ok(PasswordHash::new("$argon2id$new")));
    let service = make_service(users, hasher, MockBlobStore::new());

    let error = service
        .register(&Registration {
            name: "Jane Smith".to_owned(),
            email: "jane@example.com".to_owned(),
            password: "Student123!".to_owned(),
        })
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "User already exists");
}

#[tokio::test]
async fn register_validates_before_touching_storage() {
    let service = make_service(
        MockUserRepository::new(),
        MockPasswordHasher::new(),
        MockBlobStore::new(),
    );

    let error = service
        .register(&Registration {
            name: "J".to_owned(),
            email: "jane@example.com".to_owned(),
            password: "weak".to_owned(),
        })
        .await
        .expect_err("invalid");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn update_profile_persists_changes() {
    let jane = student();
    let requester = jane.requester();
    let mut users = users_finding(jane);
    users
        .expect_update()
        .withf(|user: &User| user.address.as_ref().map(AsRef::<str>::as_ref) == Some("1 Main St"))
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(users, MockPasswordHasher::new(), MockBlobStore::new());

    let profile = service
        .update_profile(
            &requester,
            &ProfilePatch {
                address: Some("1 Main St".to_owned()),
                ..ProfilePatch::default()
            },
        )
        .await
        .expect("update succeeds");

    assert_eq!(profile.address.as_deref(), Some("1 Main St"));
}

#[tokio::test]
async fn blocked_student_cannot_update_profile() {
    let mut jane = student();
    jane.is_blocked = true;
    let requester = jane.requester();
    let service = make_service(
        users_finding(jane),
        MockPasswordHasher::new(),
        MockBlobStore::new(),
    );

    let error = service
        .update_profile(&requester, &ProfilePatch::default())
        .await
        .expect_err("blocked");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn change_password_rejects_wrong_current_password() {
    let jane = student();
    let requester = jane.requester();
    let service = make_service(
        users_finding(jane),
        hasher_verifying(false),
        MockBlobStore::new(),
    );

    let error = service
        .change_password(
            &requester,
            &PasswordChange {
                current_password: "Wrong123!".to_owned(),
                new_password: "Fresh123!".to_owned(),
            },
        )
        .await
        .expect_err("wrong current password");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Current password is incorrect");
}

#[tokio::test]
async fn change_password_stores_new_hash() {
    let jane = student();
    let requester = jane.requester();
    let mut users = users_finding(jane);
    users
        .expect_update()
        .withf(|user: &User| user.password_hash.as_str() == "$argon2id$fresh")
        .times(1)
        .return_once(|_| Ok(()));
    let mut hasher = hasher_verifying(true);
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Ok(PasswordHash::new("$argon2id$fresh")));
    let service = make_service(users, hasher, MockBlobStore::new());

    service
        .change_password(
            &requester,
            &PasswordChange {
                current_password: "Student123!".to_owned(),
                new_password: "Fresh123!".to_owned(),
            },
        )
        .await
        .expect("password changed");
}

fn png(bytes: usize) -> AvatarUpload {
    AvatarUpload {
        content_type: "image/png".to_owned(),
        bytes: vec![0x89; bytes],
    }
}

#[rstest]
#[case(
    AvatarUpload { content_type: "image/png".to_owned(), bytes: Vec::new() },
    "Please upload an image"
)]
#[case(
    AvatarUpload { content_type: "application/pdf".to_owned(), bytes: vec![1] },
    "Only image files are allowed"
)]
#[case(png(2048), "Image exceeds the maximum upload size")]
#[tokio::test]
async fn avatar_upload_rejects_bad_input(#[case] upload: AvatarUpload, #[case] message: &str) {
    let service = make_service(
        MockUserRepository::new(),
        MockPasswordHasher::new(),
        MockBlobStore::new(),
    )
    .with_max_avatar_bytes(1024);

    let error = service
        .upload_avatar(&student().requester(), upload)
        .await
        .expect_err("rejected upload");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), message);
}

#[tokio::test]
async fn avatar_upload_replaces_previous_file() {
    let mut jane = student();
    jane.profile_picture_url = Some("/uploads/old.png".to_owned());
    let requester = jane.requester();
    let mut users = users_finding(jane);
    users.expect_update().times(1).return_once(|_| Ok(()));
    let mut blobs = MockBlobStore::new();
    blobs
        .expect_store()
        .times(1)
        .return_once(|_, _| Ok("/uploads/new.png".to_owned()));
    blobs
        .expect_remove()
        .withf(|url: &str| url == "/uploads/old.png")
        .times(1)
        .return_once(|_| Err(BlobStoreError::remove("already gone")));
    let service = make_service(users, MockPasswordHasher::new(), blobs);

    let url = service
        .upload_avatar(&requester, png(16))
        .await
        .expect("upload succeeds despite cleanup failure");

    assert_eq!(url, "/uploads/new.png");
}

#[tokio::test]
async fn avatar_upload_removes_new_file_when_save_fails() {
    let jane = student();
    let requester = jane.requester();
    let mut users = users_finding(jane);
    users
        .expect_update()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::connection("down")));
    let mut blobs = MockBlobStore::new();
    blobs
        .expect_store()
        .times(1)
        .return_once(|_, _| Ok("/uploads/new.png".to_owned()));
    blobs
        .expect_remove()
        .withf(|url: &str| url == "/uploads/new.png")
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(users, MockPasswordHasher::new(), blobs);

    let error = service
        .upload_avatar(&requester, png(16))
        .await
        .expect_err("save failed");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn resolve_requester_rejects_deleted_account() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(None));
    let service = make_service(users, MockPasswordHasher::new(), MockBlobStore::new());

    let error = service
        .resolve_requester(&UserId::random())
        .await
        .expect_err("account gone");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn resolve_requester_uses_stored_role() {
    let boss = admin();
    let id = boss.id;
    let service = make_service(
        users_finding(boss),
        MockPasswordHasher::new(),
        MockBlobStore::new(),
    );

    let requester = service.resolve_requester(&id).await.expect("resolved");

    assert_eq!(requester, Requester::new(id, Role::Admin));
}
