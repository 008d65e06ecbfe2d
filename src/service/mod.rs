//! Service layer: matching policy and the swap coordinator.

pub mod coordinator;
pub mod matcher;

pub use coordinator::{
    CheckOutcome, ConfirmationOutcome, MatchDetails, RegistrationOutcome, SpaceSet,
    SwapCoordinator,
};
