//! Matching policy for pending swap requests.
//!
//! The policy is deliberately simple and deterministic: among all pending
//! requests whose holders currently sit in the desired block (excluding
//! the searcher's own phone), pick the oldest. Oldest-first keeps matching
//! fair and starvation-free. Compatibility is one-directional: the
//! candidate's own desired block is not checked, so the counterpart may be
//! offered a block they did not ask for and can decline by never
//! confirming.

use crate::domain::SwapRequest;
use crate::error::SwapError;
use crate::persistence::SwapStore;

/// Finds the oldest pending counterpart currently holding `desired_block`.
///
/// Returns `None` when no candidate exists. This is selection only:
/// claiming the candidate is the coordinator's job and may still lose to
/// a concurrent registration.
///
/// # Errors
///
/// Returns [`SwapError::StoreFailure`] on storage failure.
pub async fn find_match<S: SwapStore + ?Sized>(
    store: &S,
    phone: &str,
    desired_block: &str,
) -> Result<Option<SwapRequest>, SwapError> {
    let candidates = store.find_pending_by_block(desired_block, phone).await?;
    Ok(candidates.into_iter().next())
}
