//! Swap coordinator: the state machine driving registration, matching,
//! dual confirmation, and the atomic assignment swap.
//!
//! The coordinator is stateless; every piece of coordination state lives
//! in the store, so any number of horizontally scaled processes can serve
//! requests concurrently. Correctness rests on the store's conditional
//! writes: a lost match claim is absorbed and re-expressed as a normal
//! pending result, never an error, and the completion transaction's
//! conditional status flip guarantees the assignment swap executes at
//! most once per matched pair.

use std::sync::Arc;

use crate::domain::{
    ConfirmationState, ParkingAssignment, PartyRole, RequestId, RequestStatus, SwapRequest,
};
use crate::error::SwapError;
use crate::persistence::SwapStore;

use super::matcher;

/// Result of checking a phone number for an existing request.
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// No active request; the caller should register one.
    New,
    /// The caller's active request, with a human-readable status message
    /// distinguishing pending from matched.
    Existing {
        /// Full projected view of the active request.
        request: SwapRequest,
        /// Status message for display.
        message: String,
    },
}

/// Counterpart snapshot reported when a registration matches immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDetails {
    /// Counterpart's phone number.
    pub phone: String,
    /// Block the counterpart currently holds.
    pub block: String,
    /// Counterpart's first space.
    pub space1: i32,
    /// Counterpart's second space.
    pub space2: i32,
}

/// Result of registering a swap request.
#[derive(Debug, Clone)]
pub enum RegistrationOutcome {
    /// No counterpart found (or the claim lost a race); the request waits.
    Pending {
        /// Identifier of the newly registered request.
        request_id: RequestId,
    },
    /// Matched immediately with a counterpart.
    Matched {
        /// Identifier of the newly registered request.
        request_id: RequestId,
        /// The matched counterpart's pre-swap snapshot.
        counterpart: MatchDetails,
    },
}

/// One side's block and space numbers, as reported back to a confirming
/// caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceSet {
    /// Block letter.
    pub block: String,
    /// First space number.
    pub space1: i32,
    /// Second space number.
    pub space2: i32,
}

impl SpaceSet {
    fn of(assignment: &ParkingAssignment) -> Self {
        Self {
            block: assignment.block_letter.clone(),
            space1: assignment.space_number1,
            space2: assignment.space_number2,
        }
    }
}

/// Result of recording a confirmation.
#[derive(Debug, Clone)]
pub enum ConfirmationOutcome {
    /// Confirmation recorded; the other party has not confirmed yet.
    Waiting {
        /// Phone of the party still due to confirm, if known.
        other_party_phone: Option<String>,
    },
    /// Both parties confirmed and the assignment swap executed.
    Completed {
        /// The caller's pre-swap block and spaces.
        old_spaces: SpaceSet,
        /// The caller's post-swap block and spaces.
        new_spaces: SpaceSet,
    },
}

/// Orchestration layer for the swap state machine.
pub struct SwapCoordinator<S> {
    store: Arc<S>,
}

impl<S> std::fmt::Debug for SwapCoordinator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapCoordinator").finish_non_exhaustive()
    }
}

impl<S> Clone for SwapCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: SwapStore> SwapCoordinator<S> {
    /// Creates a coordinator over the given store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the caller's active request, or signals that none exists.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::StoreFailure`] on storage failure.
    pub async fn check_or_register(&self, phone: &str) -> Result<CheckOutcome, SwapError> {
        let Some(request) = self.store.find_active_by_requester(phone).await? else {
            return Ok(CheckOutcome::New);
        };
        let message = match request.status {
            RequestStatus::Pending => {
                "Your swap request is still pending. No match found yet.".to_string()
            }
            _ => "Match found".to_string(),
        };
        Ok(CheckOutcome::Existing { request, message })
    }

    /// Registers a new swap request and immediately attempts a match.
    ///
    /// The insert snapshots the caller's current assignment; the match
    /// attempt claims the oldest pending counterpart holding the desired
    /// block. Losing the claim to a concurrent registration is not an
    /// error: the new request simply stays pending.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::InvalidRequest`] if the caller already has an
    /// active request, [`SwapError::StoreFailure`] on storage failure.
    pub async fn register_swap(
        &self,
        phone: &str,
        current_block: &str,
        space1: i32,
        space2: i32,
        desired_block: &str,
    ) -> Result<RegistrationOutcome, SwapError> {
        // Best-effort duplicate guard; the store does not re-check.
        if self.store.find_active_by_requester(phone).await?.is_some() {
            return Err(SwapError::InvalidRequest(
                "an active swap request already exists for this phone".to_string(),
            ));
        }

        let request = SwapRequest::new_pending(phone, current_block, space1, space2, desired_block);
        self.store.create_request(&request).await?;
        tracing::info!(
            id = %request.id,
            desired_block,
            "swap request registered"
        );

        let Some(candidate) = matcher::find_match(&*self.store, phone, desired_block).await? else {
            return Ok(RegistrationOutcome::Pending {
                request_id: request.id,
            });
        };

        if self.store.commit_match(&request, &candidate).await? {
            tracing::info!(
                id = %request.id,
                counterpart = %candidate.id,
                "swap requests matched"
            );
            Ok(RegistrationOutcome::Matched {
                request_id: request.id,
                counterpart: MatchDetails {
                    phone: candidate.requester_phone,
                    block: candidate.requester_block,
                    space1: candidate.requester_space1,
                    space2: candidate.requester_space2,
                },
            })
        } else {
            // Lost the claim to a concurrent registration; stay pending.
            tracing::info!(id = %request.id, "match claim lost, request remains pending");
            Ok(RegistrationOutcome::Pending {
                request_id: request.id,
            })
        }
    }

    /// Records one party's confirmation; executes the assignment swap when
    /// both sides have confirmed.
    ///
    /// Re-confirming an already-set flag is idempotent: the swap runs only
    /// through the store's conditional completion, at most once per pair.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::RequestNotFound`] for an unknown id or a
    /// request withdrawn before the completion transaction could run,
    /// [`SwapError::Internal`] on an inconsistent matched record,
    /// [`SwapError::StoreFailure`] on storage failure.
    pub async fn confirm_swap(
        &self,
        phone: &str,
        request_id: RequestId,
    ) -> Result<ConfirmationOutcome, SwapError> {
        let request = self
            .store
            .get_request(request_id)
            .await?
            .ok_or_else(|| SwapError::RequestNotFound(*request_id.as_uuid()))?;

        let role = request.role_of(phone);
        let updated = self
            .store
            .set_confirmed(request_id, role)
            .await?
            .ok_or_else(|| SwapError::RequestNotFound(*request_id.as_uuid()))?;

        if updated.confirmation_state() == ConfirmationState::Ready
            && updated.status == RequestStatus::Matched
        {
            return self.settle_ready_swap(role, &updated).await;
        }

        Ok(ConfirmationOutcome::Waiting {
            other_party_phone: updated.other_party_phone(role).map(str::to_string),
        })
    }

    /// Runs the assignment swap for a record whose confirmation state
    /// reached `Ready`.
    ///
    /// The store's conditional flip can fail for two distinct reasons:
    /// a concurrent confirmation already executed the swap, or the match
    /// was torn down by a delete between the confirmation write and the
    /// completion transaction. The first is reported as completed, the
    /// second must not be: no swap ran and the stored assignments are
    /// unchanged.
    async fn settle_ready_swap(
        &self,
        role: PartyRole,
        request: &SwapRequest,
    ) -> Result<ConfirmationOutcome, SwapError> {
        let owner = request
            .owner_assignment()
            .ok_or_else(|| SwapError::Internal("matched record missing owner side".to_string()))?;
        let requester = request.requester_assignment();

        let executed = self.store.complete_swap(request).await?;
        if executed {
            tracing::info!(id = %request.id, "swap completed");
        } else if let Some(current) = self.store.get_request(request.id).await? {
            // The record left Matched before the flip: the counterpart
            // withdrew and this side went back to pending. No swap ran.
            tracing::info!(id = %request.id, "match dissolved before completion");
            return Ok(ConfirmationOutcome::Waiting {
                other_party_phone: current.other_party_phone(role).map(str::to_string),
            });
        } else {
            // Record gone: either a concurrent confirmation already ran
            // the swap, or the request was deleted outright. The caller's
            // stored assignment tells the two apart.
            let (phone, incoming) = match role {
                PartyRole::Requester => (&requester.phone_number, &owner),
                PartyRole::Owner => (&owner.phone_number, &requester),
            };
            let swapped = self.store.get_assignment(phone).await?.is_some_and(|a| {
                a.block_letter == incoming.block_letter
                    && a.space_number1 == incoming.space_number1
                    && a.space_number2 == incoming.space_number2
            });
            if !swapped {
                tracing::info!(id = %request.id, "request withdrawn before completion");
                return Err(SwapError::RequestNotFound(*request.id.as_uuid()));
            }
            tracing::warn!(id = %request.id, "swap already executed, reporting completed");
        }

        let (old_spaces, new_spaces) = match role {
            PartyRole::Requester => (SpaceSet::of(&requester), SpaceSet::of(&owner)),
            PartyRole::Owner => (SpaceSet::of(&owner), SpaceSet::of(&requester)),
        };
        Ok(ConfirmationOutcome::Completed {
            old_spaces,
            new_spaces,
        })
    }

    /// Deletes the caller's swap request.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::Unauthorized`] if the request does not exist
    /// or belongs to another phone, [`SwapError::StoreFailure`] on
    /// storage failure.
    pub async fn delete_request(
        &self,
        phone: &str,
        request_id: RequestId,
    ) -> Result<(), SwapError> {
        let request = self.store.get_request(request_id).await?;
        match request {
            Some(request) if request.requester_phone == phone => {
                self.store.delete_request(request_id, phone).await?;
                tracing::info!(id = %request_id, "swap request deleted");
                Ok(())
            }
            _ => Err(SwapError::Unauthorized),
        }
    }

    /// Registers a resident's initial parking assignment (onboarding).
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::StoreFailure`] on storage failure.
    pub async fn register_parking(
        &self,
        assignment: &ParkingAssignment,
    ) -> Result<(), SwapError> {
        self.store.put_assignment(assignment).await?;
        tracing::info!(
            phone = %assignment.phone_number,
            block = %assignment.block_letter,
            "parking assignment registered"
        );
        Ok(())
    }
}
