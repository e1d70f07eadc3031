use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::error::{BubbleError, BubbleResult};
use crate::models::{Event, NewEvent};
use crate::middleware::ApiQuery;
use crate::services::{
    filter_events, filter_events_in, parse_day, points_for, Facets, FilterCriteria,
};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/facets", get(get_facets))
        .route("/events/{id}", get(get_event))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsQuery {
    pub q: Option<String>,
    pub city: Option<String>,
    pub tag: Option<String>,
    pub date: Option<String>,
    pub paid_only: Option<bool>,
}

impl EventsQuery {
    /// Converts raw query values into criteria, plus the names of filters that
    /// could not be understood and were therefore ignored.
    pub fn into_criteria(self) -> (FilterCriteria, Vec<&'static str>) {
        let mut ignored = Vec::new();
        let day = match self.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let day = parse_day(raw);
                if day.is_none() {
                    tracing::warn!("Ignoring malformed date filter {:?}", raw);
                    ignored.push("date");
                }
                day
            }
        };

        let criteria = FilterCriteria::new(
            self.q,
            self.city,
            self.tag,
            day,
            self.paid_only.unwrap_or(false),
        );
        (criteria, ignored)
    }
}

/// An event as rendered on a card, with its points badge.
#[derive(Debug, Serialize)]
pub struct EventView<'a> {
    #[serde(flatten)]
    pub event: &'a Event,
    pub points: u32,
}

impl<'a> From<&'a Event> for EventView<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            event,
            points: points_for(event),
        }
    }
}

// GET /api/events
async fn list_events(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<EventsQuery>,
) -> BubbleResult<impl IntoResponse> {
    let events = state.events.list_events().await?;
    let (criteria, ignored) = params.into_criteria();

    let offset = state
        .config
        .app
        .utc_offset_minutes
        .and_then(|minutes| FixedOffset::east_opt(minutes * 60));
    let filtered = match offset {
        Some(offset) => filter_events_in(&events, &criteria, &offset),
        None => filter_events(&events, &criteria),
    };

    tracing::debug!(
        "Filtered {} of {} events with {:?}",
        filtered.len(),
        events.len(),
        criteria
    );

    let views: Vec<EventView> = filtered.into_iter().map(EventView::from).collect();
    let count = views.len();
    Ok(Json(json!({
        "success": true,
        "count": count,
        "events": views,
        "facets": Facets::from_events(&events),
        "ignoredFilters": ignored,
    })))
}

// GET /api/events/facets
async fn get_facets(State(state): State<Arc<AppState>>) -> BubbleResult<Json<Facets>> {
    let events = state.events.list_events().await?;
    Ok(Json(Facets::from_events(&events)))
}

// GET /api/events/{id}
async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> BubbleResult<impl IntoResponse> {
    let event = state.events.get_event(&id).await?;
    let event = event.ok_or(BubbleError::EventNotFound(id))?;

    Ok(Json(json!({
        "success": true,
        "event": EventView::from(&event),
    })))
}

// POST /api/events
async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewEvent>,
) -> BubbleResult<impl IntoResponse> {
    let event = payload.into_event()?;
    state.events.create_event(&event).await?;

    tracing::info!("Created event {} ({}) in {}", event.id, event.title, event.city);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Event created successfully",
            "event": EventView::from(&event),
        })),
    ))
}
