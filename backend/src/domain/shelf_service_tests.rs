//! Tests for the shelf service.

use std::sync::Arc;

use super::*;
use chrono::{DateTime, Utc};
use crate::domain::ports::MockShelfRepository;
use crate::domain::{ErrorCode, ReleaseGuard, ShelfChanges, Subscription};
use crate::test_support::{MutableClock, fixture_timestamp, payload, uid, volume};
use rstest::{fixture, rstest};
use tokio::sync::watch;

fn make_service(repo: MockShelfRepository) -> ShelfService<MockShelfRepository> {
    ShelfService::new(Arc::new(repo), Arc::new(MutableClock::fixed()))
}

fn book(status: ReadingStatus, total: Option<u32>, pages: Option<u32>) -> UserBook {
    UserBook {
        id: volume("abc123"),
        title: "Kindred".to_owned(),
        authors: vec!["Octavia E. Butler".to_owned()],
        thumbnail: None,
        categories: Vec::new(),
        page_count: total,
        page_in_reading: pages,
        status,
        total_read_seconds: None,
        isbn10: None,
        isbn13: None,
        updated_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

#[fixture]
fn caller() -> Caller {
    Caller::User(uid("u1"))
}

fn status_request(status: ReadingStatus) -> SetStatusRequest {
    SetStatusRequest {
        volume: volume("abc123"),
        status,
        payload: Some(payload("Kindred", None)),
        page_count: None,
    }
}

#[rstest]
#[tokio::test]
async fn set_status_creates_record_for_unshelved_volume(caller: Caller) {
    let mut repo = MockShelfRepository::new();
    repo.expect_find().times(1).return_once(|_, _| Ok(None));
    repo.expect_save()
        .withf(|owner, saved| {
            owner.as_str() == "u1"
                && saved.status == ReadingStatus::ToRead
                && saved.updated_at == fixture_timestamp()
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let outcome = make_service(repo)
        .set_exclusive_status(&caller, status_request(ReadingStatus::ToRead))
        .await
        .expect("status set");

    assert_eq!(outcome.status(), Some(ReadingStatus::ToRead));
}

#[rstest]
#[tokio::test]
async fn set_status_toggles_off_active_status(caller: Caller) {
    let mut repo = MockShelfRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(|_, _| Ok(Some(book(ReadingStatus::Reading, Some(300), Some(12)))));
    repo.expect_delete().times(1).return_once(|_, _| Ok(()));
    repo.expect_save().never();

    let outcome = make_service(repo)
        .set_exclusive_status(&caller, status_request(ReadingStatus::Reading))
        .await
        .expect("toggle off");

    assert_eq!(outcome, ShelfOutcome::Removed);
}

#[rstest]
#[tokio::test]
async fn set_status_read_without_total_writes_nothing(caller: Caller) {
    let mut repo = MockShelfRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(|_, _| Ok(Some(book(ReadingStatus::Reading, None, Some(12)))));
    repo.expect_save().never();

    let err = make_service(repo)
        .set_exclusive_status(&caller, status_request(ReadingStatus::Read))
        .await
        .expect_err("missing total");

    assert_eq!(err.code(), ErrorCode::MissingPageCount);
}

#[rstest]
#[tokio::test]
async fn anonymous_caller_never_reaches_store() {
    let mut repo = MockShelfRepository::new();
    repo.expect_find().never();

    let err = make_service(repo)
        .set_exclusive_status(&Caller::Anonymous, status_request(ReadingStatus::ToRead))
        .await
        .expect_err("anonymous");

    assert_eq!(err.code(), ErrorCode::NotAuthenticated);
}

#[rstest]
#[case(ShelfRepositoryError::connection("refused"), ErrorCode::BackendUnavailable)]
#[case(ShelfRepositoryError::query("bad document"), ErrorCode::InternalError)]
#[tokio::test]
async fn store_failures_are_mapped(
    caller: Caller,
    #[case] failure: ShelfRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockShelfRepository::new();
    repo.expect_find().times(1).return_once(move |_, _| Err(failure));

    let err = make_service(repo)
        .user_book(&caller, &volume("abc123"))
        .await
        .expect_err("store failure");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn upsert_respects_override_policy(caller: Caller) {
    let mut repo = MockShelfRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(|_, _| Ok(Some(book(ReadingStatus::Reading, Some(300), Some(12)))));
    repo.expect_save().times(1).return_once(|_, _| Ok(()));

    let service = make_service(repo).with_page_count_policy(PageCountPolicy::Override);
    let updated = service
        .upsert_status_book(
            &caller,
            UpsertBookRequest {
                volume: volume("abc123"),
                changes: ShelfChanges {
                    page_count: Some(280),
                    page_in_reading: Some(290),
                    ..ShelfChanges::default()
                },
            },
        )
        .await
        .expect("upsert");

    assert_eq!(updated.page_count, Some(280));
    assert_eq!(updated.page_in_reading, Some(280));
}

#[rstest]
#[tokio::test]
async fn reading_time_requires_shelved_record(caller: Caller) {
    let mut repo = MockShelfRepository::new();
    repo.expect_find().times(1).return_once(|_, _| Ok(None));
    repo.expect_save().never();

    let err = make_service(repo)
        .record_reading_time(&caller, &volume("abc123"), 60)
        .await
        .expect_err("not shelved");

    assert_eq!(err.code(), ErrorCode::RecordNotFound);
}

#[rstest]
#[tokio::test]
async fn reading_time_is_accumulated(caller: Caller) {
    let mut existing = book(ReadingStatus::Reading, Some(300), Some(12));
    existing.total_read_seconds = Some(30);
    let mut repo = MockShelfRepository::new();
    repo.expect_find().times(1).return_once(move |_, _| Ok(Some(existing)));
    repo.expect_save()
        .withf(|_, saved| saved.total_read_seconds == Some(90))
        .times(1)
        .return_once(|_, _| Ok(()));

    let updated = make_service(repo)
        .record_reading_time(&caller, &volume("abc123"), 60)
        .await
        .expect("timer");

    assert_eq!(updated.total_read_seconds, Some(90));
}

#[rstest]
#[tokio::test]
async fn observe_status_projects_record_status(caller: Caller) {
    let (tx, rx) = watch::channel(None::<UserBook>);
    let mut repo = MockShelfRepository::new();
    repo.expect_watch()
        .times(1)
        .return_once(move |_, _| Ok(Subscription::new(rx, ReleaseGuard::noop())));

    let mut status = make_service(repo)
        .observe_status(&caller, &volume("abc123"))
        .await
        .expect("subscription");

    assert_eq!(status.next().await, Some(None));
    tx.send_replace(Some(book(ReadingStatus::Read, Some(250), Some(250))));
    assert_eq!(status.next().await, Some(Some(ReadingStatus::Read)));
}

#[rstest]
#[tokio::test]
async fn remove_delegates_to_store(caller: Caller) {
    let mut repo = MockShelfRepository::new();
    repo.expect_delete()
        .withf(|owner, target| owner.as_str() == "u1" && target.as_str() == "abc123")
        .times(1)
        .return_once(|_, _| Ok(()));

    make_service(repo)
        .remove_from_shelf(&caller, &volume("abc123"))
        .await
        .expect("removed");
}
