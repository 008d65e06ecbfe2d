//! Domain layer: core types for swap requests and parking assignments.
//!
//! This module contains the request identity newtype, the swap request
//! record with its explicit confirmation state machine, and the parking
//! assignment record that is the source of truth for current holdings.

pub mod assignment;
pub mod request_id;
pub mod swap_request;

pub use assignment::ParkingAssignment;
pub use request_id::RequestId;
pub use swap_request::{ConfirmationState, PartyRole, RequestStatus, SwapRequest};
