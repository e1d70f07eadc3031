use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::{BubbleError, BubbleResult};

/// Travel effort from the user's base location, ordered `Local < Nearby < CityAway`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceBucket {
    Local,
    Nearby,
    CityAway,
}

impl DistanceBucket {
    pub const ALL: [DistanceBucket; 3] = [
        DistanceBucket::Local,
        DistanceBucket::Nearby,
        DistanceBucket::CityAway,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DistanceBucket::Local => "local",
            DistanceBucket::Nearby => "nearby",
            DistanceBucket::CityAway => "city-away",
        }
    }
}

impl fmt::Display for DistanceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceBucket {
    type Err = BubbleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(DistanceBucket::Local),
            "nearby" => Ok(DistanceBucket::Nearby),
            "city-away" => Ok(DistanceBucket::CityAway),
            other => Err(BubbleError::UnrecognizedDistanceBucket(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
    pub city: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub recommended_majors: Vec<String>,
    pub is_paid: bool,
    pub price_amount: Option<f64>,
    pub distance_bucket: DistanceBucket,
    pub is_opposite_major: bool,
}

impl Event {
    /// Drops the price of free events so `price_amount` is only ever set when `is_paid`.
    pub fn normalised(mut self) -> Self {
        if !self.is_paid {
            self.price_amount = None;
        }
        self
    }
}

// Row as stored in the `events` table
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: String,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
    pub city: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub recommended_majors: Vec<String>,
    pub is_paid: bool,
    pub price_amount: Option<f64>,
    pub distance_bucket: String,
    pub is_opposite_major: bool,
}

impl TryFrom<EventRow> for Event {
    type Error = BubbleError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let distance_bucket = row.distance_bucket.parse()?;
        Ok(Event {
            id: row.id,
            title: row.title,
            occurs_at: row.occurs_at,
            city: row.city,
            tags: row.tags,
            image_url: row.image_url,
            recommended_majors: row.recommended_majors,
            is_paid: row.is_paid,
            price_amount: row.price_amount,
            distance_bucket,
            is_opposite_major: row.is_opposite_major,
        }
        .normalised())
    }
}

/// Payload of the event submission form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[validate(length(min = 1))]
    pub title: String,
    pub occurs_at: DateTime<Utc>,
    #[validate(length(min = 1))]
    pub city: String,
    pub tags: Vec<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub recommended_majors: Vec<String>,
    #[serde(default)]
    pub is_paid: bool,
    #[validate(range(min = 0.0))]
    pub price_amount: Option<f64>,
    pub distance_bucket: String,
    #[serde(default)]
    pub is_opposite_major: bool,
}

impl NewEvent {
    pub fn into_event(mut self) -> BubbleResult<Event> {
        // a blank URL from an untouched form field means "no image"
        self.image_url = self
            .image_url
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim().to_string());
        self.validate()?;
        let distance_bucket: DistanceBucket = self.distance_bucket.parse()?;

        if self.is_paid && self.price_amount.is_none() {
            return Err(BubbleError::Validation(
                "priceAmount is required for paid events".to_string(),
            ));
        }

        Ok(Event {
            id: uuid::Uuid::new_v4().to_string(),
            title: self.title,
            occurs_at: self.occurs_at,
            city: self.city,
            tags: clean_labels(self.tags),
            image_url: self.image_url,
            recommended_majors: clean_labels(self.recommended_majors),
            is_paid: self.is_paid,
            price_amount: self.price_amount,
            distance_bucket,
            is_opposite_major: self.is_opposite_major,
        }
        .normalised())
    }
}

fn clean_labels(labels: Vec<String>) -> Vec<String> {
    labels
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}
