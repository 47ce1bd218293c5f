//! In-memory friend request store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{FriendRequestRepository, FriendRequestRepositoryError};
use crate::domain::{
    DuplicateRequestPolicy, FriendRequest, FriendRequestId, FriendRequestStatus, RequestFilter,
};

/// Friend request store keeping requests in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryFriendRequestStore {
    requests: Arc<Mutex<Vec<FriendRequest>>>,
}

impl InMemoryFriendRequestStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FriendRequestRepository for InMemoryFriendRequestStore {
    async fn create(
        &self,
        request: &FriendRequest,
        policy: DuplicateRequestPolicy,
    ) -> Result<(), FriendRequestRepositoryError> {
        let mut requests = lock(&self.requests);
        if policy == DuplicateRequestPolicy::Reject {
            let duplicate =
                RequestFilter::pending_between(request.from_uid.clone(), request.to_uid.clone());
            if requests.iter().any(|existing| duplicate.matches(existing)) {
                return Err(FriendRequestRepositoryError::duplicate_pending(
                    request.from_uid.as_str(),
                    request.to_uid.as_str(),
                ));
            }
        }
        requests.push(request.clone());
        Ok(())
    }

    async fn find(
        &self,
        id: &FriendRequestId,
    ) -> Result<Option<FriendRequest>, FriendRequestRepositoryError> {
        Ok(lock(&self.requests)
            .iter()
            .find(|request| &request.id == id)
            .cloned())
    }

    async fn update_status(
        &self,
        id: &FriendRequestId,
        status: FriendRequestStatus,
    ) -> Result<(), FriendRequestRepositoryError> {
        let mut requests = lock(&self.requests);
        let request = requests
            .iter_mut()
            .find(|request| &request.id == id)
            .ok_or_else(|| FriendRequestRepositoryError::missing(id.to_string()))?;
        request.status = status;
        Ok(())
    }

    async fn query(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<FriendRequest>, FriendRequestRepositoryError> {
        let mut matched: Vec<FriendRequest> = lock(&self.requests)
            .iter()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect();
        // Newest insertion wins ties.
        matched.reverse();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_timestamp, uid};
    use chrono::TimeDelta;
    use rstest::rstest;

    fn request(from: &str, to: &str, offset_seconds: i64) -> FriendRequest {
        FriendRequest::pending(
            uid(from),
            uid(to),
            None,
            fixture_timestamp() + TimeDelta::seconds(offset_seconds),
        )
        .expect("request")
    }

    #[rstest]
    #[case::reject(DuplicateRequestPolicy::Reject, 1)]
    #[case::allow(DuplicateRequestPolicy::Allow, 2)]
    #[tokio::test]
    async fn duplicate_pending_follows_policy(
        #[case] policy: DuplicateRequestPolicy,
        #[case] expected: usize,
    ) {
        let store = InMemoryFriendRequestStore::new();
        store
            .create(&request("u1", "u2", 0), policy)
            .await
            .expect("first");
        let second = store.create(&request("u1", "u2", 1), policy).await;
        if policy == DuplicateRequestPolicy::Reject {
            assert!(matches!(
                second,
                Err(FriendRequestRepositoryError::DuplicatePending { .. })
            ));
        }

        let pending = store
            .query(&RequestFilter::outgoing(uid("u1")))
            .await
            .expect("query");
        assert_eq!(pending.len(), expected);
    }

    #[tokio::test]
    async fn resolved_request_does_not_block_a_new_one() {
        let store = InMemoryFriendRequestStore::new();
        let first = request("u1", "u2", 0);
        store
            .create(&first, DuplicateRequestPolicy::Reject)
            .await
            .expect("first");
        store
            .update_status(&first.id, FriendRequestStatus::Rejected)
            .await
            .expect("reject");

        store
            .create(&request("u1", "u2", 5), DuplicateRequestPolicy::Reject)
            .await
            .expect("new request after rejection");
    }

    #[tokio::test]
    async fn query_returns_newest_first() {
        let store = InMemoryFriendRequestStore::new();
        for (from, offset) in [("u2", 0), ("u3", 20), ("u4", 10)] {
            store
                .create(&request(from, "u1", offset), DuplicateRequestPolicy::Reject)
                .await
                .expect("create");
        }

        let senders: Vec<String> = store
            .query(&RequestFilter::incoming(uid("u1")))
            .await
            .expect("query")
            .into_iter()
            .map(|r| r.from_uid.to_string())
            .collect();
        assert_eq!(senders, vec!["u3", "u4", "u2"]);
    }

    #[tokio::test]
    async fn updating_unknown_request_is_missing() {
        let store = InMemoryFriendRequestStore::new();
        let err = store
            .update_status(&FriendRequestId::random(), FriendRequestStatus::Accepted)
            .await
            .expect_err("missing");
        assert!(matches!(err, FriendRequestRepositoryError::Missing { .. }));
    }
}
