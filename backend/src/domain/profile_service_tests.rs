//! Tests for the profile service.

use std::sync::Arc;

use super::*;
use crate::domain::{ErrorCode, RelationshipStatus};
use crate::domain::ports::{
    MockFriendRequestRepository, MockProfileRepository, ProfileRepositoryError,
};
use crate::test_support::uid;
use rstest::{fixture, rstest};

type Service = ProfileService<MockProfileRepository, MockFriendRequestRepository>;

fn make_service(profiles: MockProfileRepository) -> Service {
    make_service_with_requests(profiles, MockFriendRequestRepository::new())
}

fn make_service_with_requests(
    profiles: MockProfileRepository,
    requests: MockFriendRequestRepository,
) -> Service {
    ProfileService::new(Arc::new(profiles), Arc::new(requests))
}

fn profile(raw_uid: &str, username: Option<&str>) -> Profile {
    let mut profile = Profile::new(uid(raw_uid), format!("{raw_uid}@example.com"));
    profile.username = username.map(|name| Username::new(name).expect("valid username"));
    profile
}

#[fixture]
fn caller() -> Caller {
    Caller::User(uid("u1"))
}

#[rstest]
#[tokio::test]
async fn ensure_profile_creates_missing_document(caller: Caller) {
    let mut profiles = MockProfileRepository::new();
    profiles.expect_find_profile().return_once(|_| Ok(None));
    profiles
        .expect_save_profile()
        .withf(|saved| saved.uid.as_str() == "u1" && saved.email == "ada@example.com")
        .times(1)
        .return_once(|_| Ok(()));

    let created = make_service(profiles)
        .ensure_profile(&caller, " ada@example.com ")
        .await
        .expect("created");

    assert!(created.friends.is_empty());
}

#[rstest]
#[tokio::test]
async fn ensure_profile_keeps_existing_document(caller: Caller) {
    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_find_profile()
        .return_once(|_| Ok(Some(profile("u1", Some("ada")))));
    profiles.expect_save_profile().never();

    let existing = make_service(profiles)
        .ensure_profile(&caller, "other@example.com")
        .await
        .expect("existing");

    assert_eq!(existing.email, "u1@example.com");
}

#[rstest]
#[case("   ", "Lovelace")]
#[case("Ada", "")]
#[tokio::test]
async fn update_rejects_blank_names(caller: Caller, #[case] name: &str, #[case] surname: &str) {
    let mut profiles = MockProfileRepository::new();
    profiles.expect_save_profile().never();

    let err = make_service(profiles)
        .update_profile(
            &caller,
            UpdateProfileRequest {
                name: name.to_owned(),
                surname: surname.to_owned(),
            },
        )
        .await
        .expect_err("blank");

    assert_eq!(err.code(), ErrorCode::InvalidInput);
}

#[rstest]
#[tokio::test]
async fn update_trims_and_saves(caller: Caller) {
    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_find_profile()
        .return_once(|_| Ok(Some(profile("u1", None))));
    profiles
        .expect_save_profile()
        .withf(|saved| saved.name == "Ada" && saved.surname == "Lovelace")
        .times(1)
        .return_once(|_| Ok(()));

    let updated = make_service(profiles)
        .update_profile(
            &caller,
            UpdateProfileRequest {
                name: "  Ada ".to_owned(),
                surname: "Lovelace".to_owned(),
            },
        )
        .await
        .expect("updated");

    assert_eq!(updated.name, "Ada");
}

#[rstest]
#[tokio::test]
async fn taken_username_is_conflict(caller: Caller) {
    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_claim_username()
        .return_once(|_, name| Err(ProfileRepositoryError::username_taken(name.as_str())));

    let err = make_service(profiles)
        .register_username(&caller, "bookworm")
        .await
        .expect_err("taken");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn malformed_username_never_reaches_store(caller: Caller) {
    let mut profiles = MockProfileRepository::new();
    profiles.expect_claim_username().never();

    let err = make_service(profiles)
        .register_username(&caller, "no spaces allowed")
        .await
        .expect_err("malformed");

    assert_eq!(err.code(), ErrorCode::InvalidInput);
}

#[rstest]
#[tokio::test]
async fn register_returns_updated_profile(caller: Caller) {
    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_claim_username()
        .withf(|_, name| name.as_str() == "bookworm")
        .times(1)
        .return_once(|_, _| Ok(()));
    profiles
        .expect_find_profile()
        .return_once(|_| Ok(Some(profile("u1", Some("bookworm")))));

    let updated = make_service(profiles)
        .register_username(&caller, "BookWorm")
        .await
        .expect("registered");

    assert_eq!(updated.username.map(String::from).as_deref(), Some("bookworm"));
}

#[rstest]
#[tokio::test]
async fn missing_profile_is_not_found(caller: Caller) {
    let mut profiles = MockProfileRepository::new();
    profiles.expect_find_profile().return_once(|_| Ok(None));

    let err = make_service(profiles)
        .current_profile(&caller)
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::RecordNotFound);
}

#[rstest]
#[tokio::test]
async fn search_excludes_caller_and_reports_relationship(caller: Caller) {
    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_find_by_username_prefix()
        .withf(|prefix, _| prefix.eq_ignore_ascii_case("book"))
        .return_once(|_, _| {
            Ok(vec![
                profile("u1", Some("bookish")),
                profile("u2", Some("bookworm")),
                profile("u3", Some("booklover")),
            ])
        });
    profiles
        .expect_friend_uids()
        .return_once(|_| Ok(vec![uid("u3")]));
    let mut requests = MockFriendRequestRepository::new();
    requests.expect_query().return_once(|_| Ok(Vec::new()));

    let hits = make_service_with_requests(profiles, requests)
        .search_by_username(&caller, " Book ")
        .await
        .expect("hits");

    let summary: Vec<(&str, RelationshipStatus)> = hits
        .iter()
        .map(|hit| (hit.user.uid.as_str(), hit.relationship))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("u2", RelationshipStatus::NotFriend),
            ("u3", RelationshipStatus::IsFriend),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn blank_search_is_rejected(caller: Caller) {
    let mut profiles = MockProfileRepository::new();
    profiles.expect_find_by_username_prefix().never();

    let err = make_service(profiles)
        .search_by_username(&caller, "  ")
        .await
        .expect_err("blank");

    assert_eq!(err.code(), ErrorCode::InvalidInput);
}

