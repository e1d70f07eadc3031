//! Profile wallet routes: points balance, RSVPs, discount redemption.
//!
//! Every route is scoped by the `X-Bubble-Profile` header.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::{BubbleError, BubbleResult};
use crate::middleware::ProfileKey;
use crate::models::{Discount, Profile};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/discounts", get(list_discounts))
        .route(
            "/profile",
            get(get_profile).put(save_profile).delete(sign_out),
        )
        .route("/profile/rsvps", post(create_rsvp))
        .route("/profile/rsvps/{event_id}", delete(cancel_rsvp))
        .route("/profile/redemptions", post(redeem_discount))
}

// GET /api/discounts
async fn list_discounts(State(state): State<Arc<AppState>>) -> Json<Vec<Discount>> {
    Json(state.wallet.discounts().to_vec())
}

// GET /api/profile
async fn get_profile(
    State(state): State<Arc<AppState>>,
    profile: ProfileKey,
) -> BubbleResult<impl IntoResponse> {
    let summary = state.wallet.summary(profile.as_str()).await?;
    Ok(Json(summary))
}

// PUT /api/profile
async fn save_profile(
    State(state): State<Arc<AppState>>,
    profile: ProfileKey,
    Json(doc): Json<Profile>,
) -> BubbleResult<impl IntoResponse> {
    state.wallet.save_profile(profile.as_str(), &doc).await?;
    Ok(Json(json!({ "success": true, "profile": doc })))
}

// DELETE /api/profile
async fn sign_out(
    State(state): State<Arc<AppState>>,
    profile: ProfileKey,
) -> BubbleResult<StatusCode> {
    state.wallet.sign_out(profile.as_str()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RsvpRequest {
    event_id: String,
}

// POST /api/profile/rsvps
async fn create_rsvp(
    State(state): State<Arc<AppState>>,
    profile: ProfileKey,
    Json(req): Json<RsvpRequest>,
) -> BubbleResult<impl IntoResponse> {
    let event = state
        .events
        .get_event(&req.event_id)
        .await?
        .ok_or_else(|| BubbleError::EventNotFound(req.event_id.clone()))?;

    let added = state.wallet.rsvp(profile.as_str(), &event).await?;
    let status = if added { StatusCode::CREATED } else { StatusCode::OK };
    // paid events continue to checkout in the client
    Ok((
        status,
        Json(json!({
            "success": true,
            "eventId": event.id,
            "alreadyRsvped": !added,
            "requiresPayment": event.is_paid,
        })),
    ))
}

// DELETE /api/profile/rsvps/{event_id}
async fn cancel_rsvp(
    State(state): State<Arc<AppState>>,
    profile: ProfileKey,
    Path(event_id): Path<String>,
) -> BubbleResult<impl IntoResponse> {
    let removed = state.wallet.cancel_rsvp(profile.as_str(), &event_id).await?;
    Ok(Json(json!({ "success": true, "removed": removed })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RedeemRequest {
    discount_id: String,
}

// POST /api/profile/redemptions
async fn redeem_discount(
    State(state): State<Arc<AppState>>,
    profile: ProfileKey,
    Json(req): Json<RedeemRequest>,
) -> BubbleResult<impl IntoResponse> {
    let remaining = state.wallet.redeem(profile.as_str(), &req.discount_id).await?;
    Ok(Json(json!({
        "success": true,
        "discountId": req.discount_id,
        "points": remaining,
    })))
}
