//! Swap request endpoint handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{
    ActiveRequestDto, CheckOrRegisterRequest, CheckOrRegisterResponse, ConfirmSwapRequest,
    ConfirmSwapResponse, DeleteRequestRequest, MatchDetailsDto, RegisterSwapRequest,
    RegisterSwapResponse, SpacesDto, StatusMessageResponse,
};
use crate::app_state::AppState;
use crate::domain::RequestId;
use crate::error::{ErrorResponse, SwapError};
use crate::service::{CheckOutcome, ConfirmationOutcome, RegistrationOutcome};

/// `POST /check-or-register` — Resync a returning client.
///
/// # Errors
///
/// Returns [`SwapError`] on storage failure.
#[utoipa::path(
    post,
    path = "/check-or-register",
    tag = "Swaps",
    summary = "Check for an existing swap request",
    description = "Returns the caller's active swap request if one exists, or signals that the caller should register a new one.",
    request_body = CheckOrRegisterRequest,
    responses(
        (status = 200, description = "Active request or new-caller signal", body = CheckOrRegisterResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn check_or_register(
    State(state): State<AppState>,
    Json(req): Json<CheckOrRegisterRequest>,
) -> Result<impl IntoResponse, SwapError> {
    let outcome = state.coordinator.check_or_register(&req.phone_number).await?;

    let response = match outcome {
        CheckOutcome::New => CheckOrRegisterResponse {
            status: "new".to_string(),
            request: None,
            message: None,
        },
        CheckOutcome::Existing { request, message } => CheckOrRegisterResponse {
            status: request.status.as_str().to_string(),
            request: Some(ActiveRequestDto::from(&request)),
            message: Some(message),
        },
    };
    Ok(Json(response))
}

/// `POST /register-swap` — Register a swap request and try to match it.
///
/// # Errors
///
/// Returns [`SwapError`] if the caller already has an active request or
/// on storage failure.
#[utoipa::path(
    post,
    path = "/register-swap",
    tag = "Swaps",
    summary = "Register a new swap request",
    description = "Registers the caller's exchange intent and immediately searches for a pending counterpart holding the desired block. Matching is atomic: a counterpart claimed by a concurrent registration is not matched twice.",
    request_body = RegisterSwapRequest,
    responses(
        (status = 200, description = "Registered; matched or pending", body = RegisterSwapResponse),
        (status = 400, description = "Active request already exists", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn register_swap(
    State(state): State<AppState>,
    Json(req): Json<RegisterSwapRequest>,
) -> Result<impl IntoResponse, SwapError> {
    let outcome = state
        .coordinator
        .register_swap(
            &req.phone_number,
            &req.current_block,
            req.space_number1,
            req.space_number2,
            &req.desired_block,
        )
        .await?;

    let response = match outcome {
        RegistrationOutcome::Matched { counterpart, .. } => RegisterSwapResponse {
            status: "matched".to_string(),
            message: "Match found".to_string(),
            match_details: Some(MatchDetailsDto::from(counterpart)),
        },
        RegistrationOutcome::Pending { .. } => RegisterSwapResponse {
            status: "pending".to_string(),
            message: "Swap request registered. No immediate match found. Please check back later."
                .to_string(),
            match_details: None,
        },
    };
    Ok(Json(response))
}

/// `POST /confirm-swap` — Record a party's confirmation.
///
/// # Errors
///
/// Returns [`SwapError`] for an unknown request id or on storage failure.
#[utoipa::path(
    post,
    path = "/confirm-swap",
    tag = "Swaps",
    summary = "Confirm a matched swap",
    description = "Records the caller's confirmation. When both parties have confirmed, the two parking assignments are exchanged in a single atomic transaction and the swap is reported completed.",
    request_body = ConfirmSwapRequest,
    responses(
        (status = 200, description = "Waiting for the other party, or completed", body = ConfirmSwapResponse),
        (status = 404, description = "Swap request not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn confirm_swap(
    State(state): State<AppState>,
    Json(req): Json<ConfirmSwapRequest>,
) -> Result<impl IntoResponse, SwapError> {
    let outcome = state
        .coordinator
        .confirm_swap(&req.phone_number, RequestId::from_uuid(req.request_id))
        .await?;

    let response = match outcome {
        ConfirmationOutcome::Completed {
            old_spaces,
            new_spaces,
        } => ConfirmSwapResponse {
            status: "completed".to_string(),
            message: "Swap completed successfully".to_string(),
            other_party_phone: None,
            old_spaces: Some(SpacesDto::from(old_spaces)),
            new_spaces: Some(SpacesDto::from(new_spaces)),
        },
        ConfirmationOutcome::Waiting { other_party_phone } => ConfirmSwapResponse {
            status: "waiting".to_string(),
            message: "Confirmation recorded. Waiting for other party to confirm.".to_string(),
            other_party_phone,
            old_spaces: None,
            new_spaces: None,
        },
    };
    Ok(Json(response))
}

/// `POST /delete-request` — Withdraw a swap request.
///
/// # Errors
///
/// Returns [`SwapError::Unauthorized`] if the request does not exist or
/// belongs to another phone, [`SwapError`] on storage failure.
#[utoipa::path(
    post,
    path = "/delete-request",
    tag = "Swaps",
    summary = "Delete a swap request",
    description = "Deletes the caller's own swap request. Deleting a matched request releases the counterpart back into the pending pool.",
    request_body = DeleteRequestRequest,
    responses(
        (status = 200, description = "Request deleted", body = StatusMessageResponse),
        (status = 403, description = "Not the caller's request", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn delete_request(
    State(state): State<AppState>,
    Json(req): Json<DeleteRequestRequest>,
) -> Result<impl IntoResponse, SwapError> {
    state
        .coordinator
        .delete_request(&req.phone_number, RequestId::from_uuid(req.request_id))
        .await?;
    Ok(Json(StatusMessageResponse::success(
        "Request deleted successfully",
    )))
}

/// Swap routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/check-or-register", post(check_or_register))
        .route("/register-swap", post(register_swap))
        .route("/confirm-swap", post(confirm_swap))
        .route("/delete-request", post(delete_request))
}
