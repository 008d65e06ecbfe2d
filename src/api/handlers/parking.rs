//! Onboarding endpoint handler for initial parking assignments.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{RegisterParkingRequest, StatusMessageResponse};
use crate::app_state::AppState;
use crate::domain::ParkingAssignment;
use crate::error::{ErrorResponse, SwapError};

/// `POST /register-parking` — Register a resident's initial spaces.
///
/// # Errors
///
/// Returns [`SwapError`] on storage failure.
#[utoipa::path(
    post,
    path = "/register-parking",
    tag = "Parking",
    summary = "Register initial parking spaces",
    description = "Creates or replaces the caller's parking assignment record. Normally called once at onboarding.",
    request_body = RegisterParkingRequest,
    responses(
        (status = 200, description = "Assignment stored", body = StatusMessageResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn register_parking(
    State(state): State<AppState>,
    Json(req): Json<RegisterParkingRequest>,
) -> Result<impl IntoResponse, SwapError> {
    let assignment = ParkingAssignment::from(req);
    state.coordinator.register_parking(&assignment).await?;
    Ok(Json(StatusMessageResponse::success(
        "Parking space registered successfully",
    )))
}

/// Parking routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/register-parking", post(register_parking))
}
