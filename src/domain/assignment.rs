//! Current parking space holdings for a resident.

use serde::{Deserialize, Serialize};

/// One row per resident: the spaces they currently hold.
///
/// This is the source of truth for "what spaces does X hold". Created once
/// at onboarding and mutated only by the coordinator's atomic dual update
/// when a swap completes. Keyed by phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingAssignment {
    /// Phone number identifying the resident.
    pub phone_number: String,
    /// Block the resident's spaces belong to.
    pub block_letter: String,
    /// First assigned space number.
    pub space_number1: i32,
    /// Second assigned space number.
    pub space_number2: i32,
}

impl ParkingAssignment {
    /// Creates an assignment record.
    #[must_use]
    pub fn new(
        phone_number: impl Into<String>,
        block_letter: impl Into<String>,
        space_number1: i32,
        space_number2: i32,
    ) -> Self {
        Self {
            phone_number: phone_number.into(),
            block_letter: block_letter.into(),
            space_number1,
            space_number2,
        }
    }
}
