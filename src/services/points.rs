//! Bubble Points scoring.
//!
//! Every attended event earns a flat base reward. Events outside the user's
//! field of study earn the largest bonus, and travel effort adds a
//! bucket-dependent bonus on top. The total never leaves `0..=MAX_POINTS`.

use crate::models::{DistanceBucket, Event};

pub const BASE_POINTS: i64 = 10;
pub const OPPOSITE_MAJOR_BONUS: i64 = 50;
pub const MAX_POINTS: u32 = 100;

impl DistanceBucket {
    pub fn bonus(self) -> i64 {
        match self {
            DistanceBucket::Local => 0,
            DistanceBucket::Nearby => 20,
            DistanceBucket::CityAway => 40,
        }
    }
}

pub fn major_bonus(is_opposite_major: bool) -> i64 {
    if is_opposite_major {
        OPPOSITE_MAJOR_BONUS
    } else {
        0
    }
}

/// Uncapped sum of every component. Saturates instead of overflowing.
pub fn raw_total(is_opposite_major: bool, distance: DistanceBucket, rarity_boost: i64) -> i64 {
    BASE_POINTS
        .saturating_add(major_bonus(is_opposite_major))
        .saturating_add(distance.bonus())
        .saturating_add(rarity_boost)
}

/// Computes the point value of attending an event.
///
/// `rarity_boost` is an optional promotional adjustment. Negative boosts can
/// pull the total below the base reward but never below zero.
pub fn compute_points(
    is_opposite_major: bool,
    distance: DistanceBucket,
    rarity_boost: i64,
) -> u32 {
    raw_total(is_opposite_major, distance, rarity_boost).clamp(0, MAX_POINTS as i64) as u32
}

/// Points badge shown next to an event.
pub fn points_for(event: &Event) -> u32 {
    compute_points(event.is_opposite_major, event.distance_bucket, 0)
}
