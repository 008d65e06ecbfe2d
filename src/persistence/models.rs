//! Database row models mapped to and from domain types.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::{ParkingAssignment, RequestId, RequestStatus, SwapRequest};
use crate::error::SwapError;

/// A row from the `swap_requests` table.
#[derive(Debug, Clone, FromRow)]
pub struct SwapRequestRow {
    /// Primary key.
    pub id: Uuid,
    /// Phone number of the initiating party.
    pub requester_phone: String,
    /// Block the requester holds.
    pub requester_block: String,
    /// Requester's first space.
    pub requester_space1: i32,
    /// Requester's second space.
    pub requester_space2: i32,
    /// Block the requester wants.
    pub desired_block: String,
    /// Counterpart phone, null until matched.
    pub owner_phone: Option<String>,
    /// Counterpart block, null until matched.
    pub owner_block: Option<String>,
    /// Counterpart first space, null until matched.
    pub owner_space1: Option<i32>,
    /// Counterpart second space, null until matched.
    pub owner_space2: Option<i32>,
    /// Requester confirmation flag.
    pub requester_confirmed: bool,
    /// Owner confirmation flag.
    pub owner_confirmed: bool,
    /// Status discriminator (`pending`, `matched`, `completed`).
    pub status: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SwapRequestRow> for SwapRequest {
    type Error = SwapError;

    fn try_from(row: SwapRequestRow) -> Result<Self, Self::Error> {
        let status = RequestStatus::parse(&row.status).ok_or_else(|| {
            SwapError::Internal(format!("unknown request status in store: {}", row.status))
        })?;
        Ok(Self {
            id: RequestId::from_uuid(row.id),
            requester_phone: row.requester_phone,
            requester_block: row.requester_block,
            requester_space1: row.requester_space1,
            requester_space2: row.requester_space2,
            desired_block: row.desired_block,
            owner_phone: row.owner_phone,
            owner_block: row.owner_block,
            owner_space1: row.owner_space1,
            owner_space2: row.owner_space2,
            requester_confirmed: row.requester_confirmed,
            owner_confirmed: row.owner_confirmed,
            status,
            created_at: row.created_at,
        })
    }
}

/// A row from the `parking_assignments` table.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentRow {
    /// Primary key.
    pub phone_number: String,
    /// Block the resident's spaces belong to.
    pub block_letter: String,
    /// First assigned space number.
    pub space_number1: i32,
    /// Second assigned space number.
    pub space_number2: i32,
}

impl From<AssignmentRow> for ParkingAssignment {
    fn from(row: AssignmentRow) -> Self {
        Self {
            phone_number: row.phone_number,
            block_letter: row.block_letter,
            space_number1: row.space_number1,
            space_number2: row.space_number2,
        }
    }
}
