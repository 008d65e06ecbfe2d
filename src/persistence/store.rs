//! Storage contract for swap coordination state.
//!
//! [`SwapStore`] is the seam between the coordination logic and the
//! persistent store. It spans both tables because two operations are
//! transactions across records: the match commit (two swap requests) and
//! the completion (one swap request plus two parking assignments). All
//! coordination correctness rests on the conditional-write and
//! all-or-nothing semantics documented per method; implementations must
//! not expose partially applied transactions.

use async_trait::async_trait;

use crate::domain::{ParkingAssignment, PartyRole, RequestId, SwapRequest};
use crate::error::SwapError;

/// Abstract transactional store for swap requests and parking assignments.
#[async_trait]
pub trait SwapStore: Send + Sync {
    /// Returns the active swap request registered by `phone`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::StoreFailure`] on storage failure.
    async fn find_active_by_requester(&self, phone: &str)
    -> Result<Option<SwapRequest>, SwapError>;

    /// Inserts a new request unconditionally.
    ///
    /// The caller checks the one-active-request-per-phone precondition
    /// immediately prior; this insert does not re-check it.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::StoreFailure`] on storage failure.
    async fn create_request(&self, request: &SwapRequest) -> Result<(), SwapError>;

    /// Returns all pending requests whose holders currently sit in
    /// `block`, excluding `exclude_phone`, ordered by creation time
    /// ascending (oldest first).
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::StoreFailure`] on storage failure.
    async fn find_pending_by_block(
        &self,
        block: &str,
        exclude_phone: &str,
    ) -> Result<Vec<SwapRequest>, SwapError>;

    /// Point lookup by request ID.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::StoreFailure`] on storage failure.
    async fn get_request(&self, id: RequestId) -> Result<Option<SwapRequest>, SwapError>;

    /// Atomically transitions both records to `Matched` in a single
    /// all-or-nothing transaction, writing each side's `owner_*` fields
    /// from the other side's requester snapshot. Both records'
    /// confirmation flags are reset, so a confirmation recorded while a
    /// record was still `Pending` never counts toward completing the
    /// match.
    ///
    /// Each update is conditional on the record still being `Pending` at
    /// apply time. Returns `false` (with no side effects) if either
    /// condition fails; this is the anti-double-match guard, so a
    /// counterpart claimed by a concurrent registration stays with its
    /// winner.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::StoreFailure`] on storage failure.
    async fn commit_match(
        &self,
        new_request: &SwapRequest,
        candidate: &SwapRequest,
    ) -> Result<bool, SwapError>;

    /// Sets the given role's confirmation flag and returns the full
    /// post-update record, or `None` if the request no longer exists.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::StoreFailure`] on storage failure.
    async fn set_confirmed(
        &self,
        id: RequestId,
        role: PartyRole,
    ) -> Result<Option<SwapRequest>, SwapError>;

    /// Deletes a request, conditional on `requester_phone` owning it.
    ///
    /// If the deleted request was `Matched`, the counterpart record is
    /// reset to `Pending` (owner fields and confirmations cleared) in the
    /// same transaction, so the counterpart is re-eligible for matching
    /// rather than stranded.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::Unauthorized`] if the request does not exist
    /// or belongs to another phone, [`SwapError::StoreFailure`] on
    /// storage failure.
    async fn delete_request(&self, id: RequestId, requester_phone: &str)
    -> Result<(), SwapError>;

    /// Executes the final assignment swap in a single all-or-nothing
    /// transaction: flips the request from `Matched` to `Completed`
    /// (conditional, the exactly-once gate), writes the requester's assignment to the
    /// owner's pre-swap block/spaces and vice versa, then deletes the
    /// request record along with the counterpart's mirror record for the
    /// same pair.
    ///
    /// Returns `false` with no side effects if the conditional flip does
    /// not apply, i.e. the swap already ran or the record left `Matched`.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::Internal`] if `request` lacks an owner-side
    /// snapshot, [`SwapError::StoreFailure`] on storage failure.
    async fn complete_swap(&self, request: &SwapRequest) -> Result<bool, SwapError>;

    /// Creates or replaces a parking assignment (onboarding).
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::StoreFailure`] on storage failure.
    async fn put_assignment(&self, assignment: &ParkingAssignment) -> Result<(), SwapError>;

    /// Point lookup of a resident's current assignment.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::StoreFailure`] on storage failure.
    async fn get_assignment(&self, phone: &str) -> Result<Option<ParkingAssignment>, SwapError>;
}
