//! Swap endpoint DTOs.
//!
//! Field names follow the original client wire contract (`phoneNumber`,
//! `currentBlock`, `matchingPhone`, ...), hence the camelCase renames.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::SwapRequest;
use crate::service::{MatchDetails, SpaceSet};

/// Request body for `POST /check-or-register`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckOrRegisterRequest {
    /// Caller's phone number token.
    pub phone_number: String,
}

/// Projection of the caller's active swap request.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRequestDto {
    /// Request identifier, used for confirm and delete calls.
    pub id: Uuid,
    /// Block the caller held at registration time.
    pub current_block: String,
    /// Caller's first space.
    pub current_space1: i32,
    /// Caller's second space.
    pub current_space2: i32,
    /// Block the caller asked for.
    pub desired_block: String,
    /// Matched counterpart's phone, if matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_phone: Option<String>,
    /// Matched counterpart's block, if matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_block: Option<String>,
    /// Matched counterpart's first space, if matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_space1: Option<i32>,
    /// Matched counterpart's second space, if matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_space2: Option<i32>,
    /// Whether the requester side has confirmed.
    pub requester_confirmed: bool,
    /// Whether the owner side has confirmed.
    pub owner_confirmed: bool,
}

impl From<&SwapRequest> for ActiveRequestDto {
    fn from(request: &SwapRequest) -> Self {
        Self {
            id: *request.id.as_uuid(),
            current_block: request.requester_block.clone(),
            current_space1: request.requester_space1,
            current_space2: request.requester_space2,
            desired_block: request.desired_block.clone(),
            matching_phone: request.owner_phone.clone(),
            matching_block: request.owner_block.clone(),
            matching_space1: request.owner_space1,
            matching_space2: request.owner_space2,
            requester_confirmed: request.requester_confirmed,
            owner_confirmed: request.owner_confirmed,
        }
    }
}

/// Response body for `POST /check-or-register`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckOrRegisterResponse {
    /// `"new"`, `"pending"` or `"matched"`.
    pub status: String,
    /// The active request, absent when status is `"new"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<ActiveRequestDto>,
    /// Human-readable status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request body for `POST /register-swap`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSwapRequest {
    /// Caller's phone number token.
    pub phone_number: String,
    /// Block the caller currently holds.
    pub current_block: String,
    /// Caller's first space.
    pub space_number1: i32,
    /// Caller's second space.
    pub space_number2: i32,
    /// Block the caller wants to move to.
    pub desired_block: String,
}

/// Matched counterpart snapshot in a registration response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetailsDto {
    /// Counterpart's phone number.
    pub matching_phone: String,
    /// Block the counterpart currently holds.
    pub matching_block: String,
    /// Counterpart's first space.
    pub matching_space1: i32,
    /// Counterpart's second space.
    pub matching_space2: i32,
}

impl From<MatchDetails> for MatchDetailsDto {
    fn from(details: MatchDetails) -> Self {
        Self {
            matching_phone: details.phone,
            matching_block: details.block,
            matching_space1: details.space1,
            matching_space2: details.space2,
        }
    }
}

/// Response body for `POST /register-swap`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSwapResponse {
    /// `"pending"` or `"matched"`.
    pub status: String,
    /// Human-readable outcome message.
    pub message: String,
    /// Counterpart snapshot, present only when matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_details: Option<MatchDetailsDto>,
}

/// Request body for `POST /confirm-swap`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmSwapRequest {
    /// Caller's phone number token.
    pub phone_number: String,
    /// Identifier of the request being confirmed.
    pub request_id: Uuid,
}

/// One side's block and spaces in a completion response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpacesDto {
    /// Block letter.
    pub block: String,
    /// First space number.
    pub space1: i32,
    /// Second space number.
    pub space2: i32,
}

impl From<SpaceSet> for SpacesDto {
    fn from(spaces: SpaceSet) -> Self {
        Self {
            block: spaces.block,
            space1: spaces.space1,
            space2: spaces.space2,
        }
    }
}

/// Response body for `POST /confirm-swap`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmSwapResponse {
    /// `"waiting"` or `"completed"`.
    pub status: String,
    /// Human-readable outcome message.
    pub message: String,
    /// Phone of the party still due to confirm, when waiting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_party_phone: Option<String>,
    /// Caller's pre-swap spaces, when completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_spaces: Option<SpacesDto>,
    /// Caller's post-swap spaces, when completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_spaces: Option<SpacesDto>,
}

/// Request body for `POST /delete-request`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequestRequest {
    /// Caller's phone number token.
    pub phone_number: String,
    /// Identifier of the request being deleted.
    pub request_id: Uuid,
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn active_request_projects_wire_names() {
        let request = SwapRequest::new_pending("07700900001", "A", 1, 2, "B");
        let dto = ActiveRequestDto::from(&request);
        let Ok(json) = serde_json::to_value(&dto) else {
            panic!("serialization failed");
        };
        assert_eq!(json["currentBlock"], "A");
        assert_eq!(json["desiredBlock"], "B");
        assert_eq!(json["requesterConfirmed"], false);
        // Unmatched side is omitted entirely.
        assert!(json.get("matchingPhone").is_none());
    }

    #[test]
    fn register_request_accepts_wire_names() {
        let body = r#"{
            "phoneNumber": "07700900001",
            "currentBlock": "A",
            "spaceNumber1": 1,
            "spaceNumber2": 2,
            "desiredBlock": "B"
        }"#;
        let Ok(parsed) = serde_json::from_str::<RegisterSwapRequest>(body) else {
            panic!("deserialization failed");
        };
        assert_eq!(parsed.phone_number, "07700900001");
        assert_eq!(parsed.desired_block, "B");
    }

    #[test]
    fn match_details_map_to_wire_names() {
        let dto = MatchDetailsDto::from(MatchDetails {
            phone: "07700900002".to_string(),
            block: "B".to_string(),
            space1: 3,
            space2: 4,
        });
        let Ok(json) = serde_json::to_value(&dto) else {
            panic!("serialization failed");
        };
        assert_eq!(json["matchingPhone"], "07700900002");
        assert_eq!(json["matchingBlock"], "B");
        assert_eq!(json["matchingSpace1"], 3);
    }
}
