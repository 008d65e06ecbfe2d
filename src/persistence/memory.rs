//! In-memory store with the same conditional and transactional semantics
//! as the PostgreSQL implementation, used by coordinator tests.
//!
//! A single async mutex makes every operation trivially all-or-nothing;
//! the conditional guards (`Pending` at claim time, `Matched` plus both
//! confirmations at completion time) are checked before any mutation so
//! a failed condition leaves the maps untouched.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::store::SwapStore;
use crate::domain::{
    ParkingAssignment, PartyRole, RequestId, RequestStatus, SwapRequest,
};
use crate::error::SwapError;

#[derive(Debug, Default)]
struct Inner {
    requests: HashMap<RequestId, SwapRequest>,
    assignments: HashMap<String, ParkingAssignment>,
    swaps_executed: u32,
}

/// Test double for [`SwapStore`] backed by in-process maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of assignment swaps that have actually executed.
    pub async fn swaps_executed(&self) -> u32 {
        self.inner.lock().await.swaps_executed
    }

    /// Number of swap request records currently stored.
    pub async fn request_count(&self) -> usize {
        self.inner.lock().await.requests.len()
    }
}

#[async_trait]
impl SwapStore for MemoryStore {
    async fn find_active_by_requester(
        &self,
        phone: &str,
    ) -> Result<Option<SwapRequest>, SwapError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .requests
            .values()
            .filter(|r| r.requester_phone == phone)
            .min_by_key(|r| r.created_at)
            .cloned())
    }

    async fn create_request(&self, request: &SwapRequest) -> Result<(), SwapError> {
        let mut inner = self.inner.lock().await;
        inner.requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn find_pending_by_block(
        &self,
        block: &str,
        exclude_phone: &str,
    ) -> Result<Vec<SwapRequest>, SwapError> {
        let inner = self.inner.lock().await;
        let mut pending: Vec<SwapRequest> = inner
            .requests
            .values()
            .filter(|r| {
                r.status == RequestStatus::Pending
                    && r.requester_block == block
                    && r.requester_phone != exclude_phone
            })
            .cloned()
            .collect();
        pending.sort_by_key(|r| r.created_at);
        Ok(pending)
    }

    async fn get_request(&self, id: RequestId) -> Result<Option<SwapRequest>, SwapError> {
        let inner = self.inner.lock().await;
        Ok(inner.requests.get(&id).cloned())
    }

    async fn commit_match(
        &self,
        new_request: &SwapRequest,
        candidate: &SwapRequest,
    ) -> Result<bool, SwapError> {
        let mut inner = self.inner.lock().await;

        // Both claims are checked before either record is touched.
        let both_pending = matches!(
            inner.requests.get(&new_request.id),
            Some(r) if r.status == RequestStatus::Pending
        ) && matches!(
            inner.requests.get(&candidate.id),
            Some(r) if r.status == RequestStatus::Pending
        );
        if !both_pending {
            return Ok(false);
        }

        // Confirmations reset at match time: a flag set while the record
        // was still pending must not count toward completing this match.
        if let Some(record) = inner.requests.get_mut(&new_request.id) {
            record.owner_phone = Some(candidate.requester_phone.clone());
            record.owner_block = Some(candidate.requester_block.clone());
            record.owner_space1 = Some(candidate.requester_space1);
            record.owner_space2 = Some(candidate.requester_space2);
            record.requester_confirmed = false;
            record.owner_confirmed = false;
            record.status = RequestStatus::Matched;
        }
        if let Some(record) = inner.requests.get_mut(&candidate.id) {
            record.owner_phone = Some(new_request.requester_phone.clone());
            record.owner_block = Some(new_request.requester_block.clone());
            record.owner_space1 = Some(new_request.requester_space1);
            record.owner_space2 = Some(new_request.requester_space2);
            record.requester_confirmed = false;
            record.owner_confirmed = false;
            record.status = RequestStatus::Matched;
        }
        Ok(true)
    }

    async fn set_confirmed(
        &self,
        id: RequestId,
        role: PartyRole,
    ) -> Result<Option<SwapRequest>, SwapError> {
        let mut inner = self.inner.lock().await;
        let Some(record) = inner.requests.get_mut(&id) else {
            return Ok(None);
        };
        match role {
            PartyRole::Requester => record.requester_confirmed = true,
            PartyRole::Owner => record.owner_confirmed = true,
        }
        Ok(Some(record.clone()))
    }

    async fn delete_request(
        &self,
        id: RequestId,
        requester_phone: &str,
    ) -> Result<(), SwapError> {
        let mut inner = self.inner.lock().await;
        let Some(record) = inner.requests.get(&id) else {
            return Err(SwapError::Unauthorized);
        };
        if record.requester_phone != requester_phone {
            return Err(SwapError::Unauthorized);
        }

        let counterpart_phone = if record.status == RequestStatus::Matched {
            record.owner_phone.clone()
        } else {
            None
        };
        let deleted_phone = record.requester_phone.clone();
        inner.requests.remove(&id);

        if let Some(counterpart_phone) = counterpart_phone {
            let counterpart = inner.requests.values_mut().find(|r| {
                r.requester_phone == counterpart_phone
                    && r.status == RequestStatus::Matched
                    && r.owner_phone.as_deref() == Some(deleted_phone.as_str())
            });
            if let Some(counterpart) = counterpart {
                counterpart.owner_phone = None;
                counterpart.owner_block = None;
                counterpart.owner_space1 = None;
                counterpart.owner_space2 = None;
                counterpart.requester_confirmed = false;
                counterpart.owner_confirmed = false;
                counterpart.status = RequestStatus::Pending;
            }
        }
        Ok(())
    }

    async fn complete_swap(&self, request: &SwapRequest) -> Result<bool, SwapError> {
        let owner = request.owner_assignment().ok_or_else(|| {
            SwapError::Internal("completing a swap without an owner-side snapshot".to_string())
        })?;
        let requester = request.requester_assignment();

        let mut inner = self.inner.lock().await;

        // Exactly-once gate, same condition as the SQL status flip.
        let ready = matches!(
            inner.requests.get(&request.id),
            Some(r) if r.status == RequestStatus::Matched
                && r.requester_confirmed
                && r.owner_confirmed
        );
        if !ready {
            return Ok(false);
        }

        inner.assignments.insert(
            requester.phone_number.clone(),
            ParkingAssignment::new(
                requester.phone_number.clone(),
                owner.block_letter.clone(),
                owner.space_number1,
                owner.space_number2,
            ),
        );
        inner.assignments.insert(
            owner.phone_number.clone(),
            ParkingAssignment::new(
                owner.phone_number.clone(),
                requester.block_letter.clone(),
                requester.space_number1,
                requester.space_number2,
            ),
        );
        inner.requests.remove(&request.id);
        let mirror_id = inner
            .requests
            .values()
            .find(|r| {
                r.requester_phone == owner.phone_number
                    && r.status == RequestStatus::Matched
                    && r.owner_phone.as_deref() == Some(requester.phone_number.as_str())
            })
            .map(|r| r.id);
        if let Some(mirror_id) = mirror_id {
            inner.requests.remove(&mirror_id);
        }
        inner.swaps_executed += 1;
        Ok(true)
    }

    async fn put_assignment(&self, assignment: &ParkingAssignment) -> Result<(), SwapError> {
        let mut inner = self.inner.lock().await;
        inner
            .assignments
            .insert(assignment.phone_number.clone(), assignment.clone());
        Ok(())
    }

    async fn get_assignment(&self, phone: &str) -> Result<Option<ParkingAssignment>, SwapError> {
        let inner = self.inner.lock().await;
        Ok(inner.assignments.get(phone).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn pending(phone: &str, block: &str, desired: &str) -> SwapRequest {
        SwapRequest::new_pending(phone, block, 1, 2, desired)
    }

    #[tokio::test]
    async fn commit_match_fails_when_candidate_already_claimed() {
        let store = MemoryStore::new();
        let new_request = pending("07700900001", "A", "B");
        let candidate = pending("07700900002", "B", "A");
        let _ = store.create_request(&new_request).await;
        let _ = store.create_request(&candidate).await;

        // A concurrent registration claimed the candidate first.
        let rival = pending("07700900003", "A", "B");
        let _ = store.create_request(&rival).await;
        let Ok(true) = store.commit_match(&rival, &candidate).await else {
            panic!("rival claim should succeed");
        };

        let Ok(claimed) = store.commit_match(&new_request, &candidate).await else {
            panic!("commit_match errored");
        };
        assert!(!claimed);

        // The loser's record is untouched by the failed claim.
        let Ok(Some(loser)) = store.get_request(new_request.id).await else {
            panic!("loser record missing");
        };
        assert_eq!(loser.status, RequestStatus::Pending);
        assert!(loser.owner_phone.is_none());
    }

    #[tokio::test]
    async fn complete_swap_runs_at_most_once() {
        let store = MemoryStore::new();
        let new_request = pending("07700900001", "A", "B");
        let candidate = pending("07700900002", "B", "A");
        let _ = store.create_request(&new_request).await;
        let _ = store.create_request(&candidate).await;
        let Ok(true) = store.commit_match(&new_request, &candidate).await else {
            panic!("match commit failed");
        };

        let _ = store.set_confirmed(new_request.id, PartyRole::Requester).await;
        let Ok(Some(ready)) = store.set_confirmed(new_request.id, PartyRole::Owner).await else {
            panic!("confirmation failed");
        };

        let Ok(first) = store.complete_swap(&ready).await else {
            panic!("completion errored");
        };
        assert!(first);
        let Ok(second) = store.complete_swap(&ready).await else {
            panic!("repeat completion errored");
        };
        assert!(!second);
        assert_eq!(store.swaps_executed().await, 1);
    }

    #[tokio::test]
    async fn complete_swap_removes_both_records_of_the_pair() {
        let store = MemoryStore::new();
        let new_request = pending("07700900001", "A", "B");
        let candidate = pending("07700900002", "B", "A");
        let _ = store.create_request(&new_request).await;
        let _ = store.create_request(&candidate).await;
        let Ok(true) = store.commit_match(&new_request, &candidate).await else {
            panic!("match commit failed");
        };
        let _ = store.set_confirmed(new_request.id, PartyRole::Requester).await;
        let Ok(Some(ready)) = store.set_confirmed(new_request.id, PartyRole::Owner).await else {
            panic!("confirmation failed");
        };

        let Ok(true) = store.complete_swap(&ready).await else {
            panic!("completion failed");
        };
        assert_eq!(store.request_count().await, 0);
    }

    #[tokio::test]
    async fn complete_swap_requires_owner_snapshot() {
        let store = MemoryStore::new();
        let request = pending("07700900001", "A", "B");
        let _ = store.create_request(&request).await;

        let result = store.complete_swap(&request).await;
        assert!(matches!(result, Err(SwapError::Internal(_))));
    }
}
