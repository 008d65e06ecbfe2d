//! Data Transfer Objects for REST request/response serialization.
//!
//! Wire field names preserve the original client contract, so every DTO
//! renames to camelCase.

pub mod common_dto;
pub mod parking_dto;
pub mod swap_dto;

pub use common_dto::*;
pub use parking_dto::*;
pub use swap_dto::*;
