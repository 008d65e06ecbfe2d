//! Onboarding DTOs for initial parking assignments.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::ParkingAssignment;

/// Request body for `POST /register-parking`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterParkingRequest {
    /// Resident's phone number token.
    pub phone_number: String,
    /// Block the resident's spaces belong to.
    pub block_letter: String,
    /// First assigned space number.
    pub space_number1: i32,
    /// Second assigned space number.
    pub space_number2: i32,
}

impl From<RegisterParkingRequest> for ParkingAssignment {
    fn from(req: RegisterParkingRequest) -> Self {
        Self::new(
            req.phone_number,
            req.block_letter,
            req.space_number1,
            req.space_number2,
        )
    }
}
