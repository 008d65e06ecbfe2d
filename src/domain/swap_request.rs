//! Swap request record and its confirmation state machine.
//!
//! A [`SwapRequest`] is one resident's active exchange intent. It starts
//! `Pending`, becomes `Matched` when a counterpart is found, and is removed
//! in the same transaction that executes the final assignment swap. The
//! two confirmation booleans are projected into an explicit
//! [`ConfirmationState`] so the swap-trigger guard ("exactly the transition
//! into `Ready` fires the swap, exactly once") is a checkable invariant
//! rather than an accidental re-entrancy bug.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ParkingAssignment;
use super::RequestId;

/// Lifecycle status of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// No counterpart found yet.
    Pending,
    /// Paired with a counterpart, awaiting mutual confirmation.
    Matched,
    /// Both parties confirmed and the assignment swap executed. Transient:
    /// the record is deleted in the same transaction that flips into this
    /// status, so it is never observable through the read operations.
    Completed,
}

impl RequestStatus {
    /// Returns the storage/wire representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Matched => "matched",
            Self::Completed => "completed",
        }
    }

    /// Parses a storage representation back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "matched" => Some(Self::Matched),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Which side of a swap a phone number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
    /// The party that registered this request.
    Requester,
    /// The matched counterpart.
    Owner,
}

/// Explicit projection of the `(requester_confirmed, owner_confirmed)`
/// boolean pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationState {
    /// Neither side has confirmed.
    AwaitingBoth,
    /// Requester confirmed, owner has not.
    AwaitingOwner,
    /// Owner confirmed, requester has not.
    AwaitingRequester,
    /// Both sides confirmed; the assignment swap may execute.
    Ready,
}

/// One resident's active exchange intent.
///
/// The `requester_*` fields snapshot the requester's assignment at
/// registration time. The `owner_*` fields are `None` while `Pending`;
/// once `Matched` they hold the counterpart's identity and *pre-swap*
/// assignment, the snapshot being exchanged rather than the post-swap
/// target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Unique identifier, generated at registration.
    pub id: RequestId,
    /// Phone number of the initiating party.
    pub requester_phone: String,
    /// Block the requester currently holds.
    pub requester_block: String,
    /// Requester's first space.
    pub requester_space1: i32,
    /// Requester's second space.
    pub requester_space2: i32,
    /// The block the requester wants to move to.
    pub desired_block: String,
    /// Counterpart's phone number; `None` until matched.
    pub owner_phone: Option<String>,
    /// Counterpart's current block; `None` until matched.
    pub owner_block: Option<String>,
    /// Counterpart's first space; `None` until matched.
    pub owner_space1: Option<i32>,
    /// Counterpart's second space; `None` until matched.
    pub owner_space2: Option<i32>,
    /// Whether the requester has confirmed the matched swap.
    pub requester_confirmed: bool,
    /// Whether the counterpart has confirmed the matched swap.
    pub owner_confirmed: bool,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Registration timestamp; drives oldest-first matching.
    pub created_at: DateTime<Utc>,
}

impl SwapRequest {
    /// Creates a fresh `Pending` request snapshotting the requester's
    /// current assignment and desired block.
    #[must_use]
    pub fn new_pending(
        requester_phone: impl Into<String>,
        requester_block: impl Into<String>,
        requester_space1: i32,
        requester_space2: i32,
        desired_block: impl Into<String>,
    ) -> Self {
        Self {
            id: RequestId::new(),
            requester_phone: requester_phone.into(),
            requester_block: requester_block.into(),
            requester_space1,
            requester_space2,
            desired_block: desired_block.into(),
            owner_phone: None,
            owner_block: None,
            owner_space1: None,
            owner_space2: None,
            requester_confirmed: false,
            owner_confirmed: false,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Projects the confirmation boolean pair into its explicit state.
    #[must_use]
    pub const fn confirmation_state(&self) -> ConfirmationState {
        match (self.requester_confirmed, self.owner_confirmed) {
            (false, false) => ConfirmationState::AwaitingBoth,
            (true, false) => ConfirmationState::AwaitingOwner,
            (false, true) => ConfirmationState::AwaitingRequester,
            (true, true) => ConfirmationState::Ready,
        }
    }

    /// Determines which side of the swap a caller is on.
    ///
    /// Anyone who is not the requester is treated as the owner side; the
    /// service does not verify party legitimacy beyond the phone token.
    #[must_use]
    pub fn role_of(&self, phone: &str) -> PartyRole {
        if phone == self.requester_phone {
            PartyRole::Requester
        } else {
            PartyRole::Owner
        }
    }

    /// Phone number of the party opposite the given role, if known.
    #[must_use]
    pub fn other_party_phone(&self, role: PartyRole) -> Option<&str> {
        match role {
            PartyRole::Requester => self.owner_phone.as_deref(),
            PartyRole::Owner => Some(self.requester_phone.as_str()),
        }
    }

    /// The requester's pre-swap assignment snapshot.
    #[must_use]
    pub fn requester_assignment(&self) -> ParkingAssignment {
        ParkingAssignment::new(
            self.requester_phone.clone(),
            self.requester_block.clone(),
            self.requester_space1,
            self.requester_space2,
        )
    }

    /// The counterpart's pre-swap assignment snapshot, if matched.
    #[must_use]
    pub fn owner_assignment(&self) -> Option<ParkingAssignment> {
        Some(ParkingAssignment::new(
            self.owner_phone.clone()?,
            self.owner_block.clone()?,
            self.owner_space1?,
            self.owner_space2?,
        ))
    }
}
