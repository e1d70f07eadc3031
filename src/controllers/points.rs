use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::BubbleResult;
use crate::models::DistanceBucket;
use crate::middleware::ApiQuery;
use crate::services::compute_points;
use crate::services::points::{major_bonus, raw_total, BASE_POINTS, MAX_POINTS};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/points/preview", get(preview_points))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuery {
    #[serde(default)]
    pub is_opposite_major: bool,
    pub distance_bucket: String,
    #[serde(default)]
    pub rarity_boost: i64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointsPreview {
    pub points: u32,
    pub base: i64,
    pub major_bonus: i64,
    pub distance_bonus: i64,
    pub rarity_boost: i64,
    pub capped: bool,
}

impl PointsPreview {
    pub fn new(is_opposite_major: bool, distance: DistanceBucket, rarity_boost: i64) -> Self {
        Self {
            points: compute_points(is_opposite_major, distance, rarity_boost),
            base: BASE_POINTS,
            major_bonus: major_bonus(is_opposite_major),
            distance_bonus: distance.bonus(),
            rarity_boost,
            capped: raw_total(is_opposite_major, distance, rarity_boost) > MAX_POINTS as i64,
        }
    }
}

// GET /api/points/preview, used by the event submission form
async fn preview_points(
    State(_state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<PreviewQuery>,
) -> BubbleResult<Json<PointsPreview>> {
    let distance: DistanceBucket = params.distance_bucket.parse()?;
    Ok(Json(PointsPreview::new(
        params.is_opposite_major,
        distance,
        params.rarity_boost,
    )))
}
