//! Event list filtering and facet extraction.
//!
//! Filtering is a stable AND over the supplied criteria. Empty criteria act as
//! wildcards. Facets are always derived from the full list so the filter
//! controls keep offering every option.

use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::Event;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub query: String,
    pub city: Option<String>,
    pub tag: Option<String>,
    pub day: Option<NaiveDate>,
    pub paid_only: bool,
}

impl FilterCriteria {
    /// Builds criteria from raw form values. Blank strings become wildcards.
    pub fn new(
        query: Option<String>,
        city: Option<String>,
        tag: Option<String>,
        day: Option<NaiveDate>,
        paid_only: bool,
    ) -> Self {
        Self {
            query: query.unwrap_or_default(),
            city: city.filter(|c| !c.is_empty()),
            tag: tag.filter(|t| !t.is_empty()),
            day,
            paid_only,
        }
    }

    pub fn matches_in<Tz: TimeZone>(&self, event: &Event, tz: &Tz) -> bool {
        if !self.query.is_empty() {
            let needle = self.query.to_lowercase();
            if !event.title.to_lowercase().contains(&needle)
                && !event.city.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if let Some(city) = &self.city {
            if &event.city != city {
                return false;
            }
        }

        if let Some(tag) = &self.tag {
            if !event.tags.contains(tag) {
                return false;
            }
        }

        if self.paid_only && !event.is_paid {
            return false;
        }

        if let Some(day) = self.day {
            // [00:00:00.000, 23:59:59.999] in `tz` is exactly the calendar day there
            if event.occurs_at.with_timezone(tz).date_naive() != day {
                return false;
            }
        }

        true
    }
}

/// Parses a `YYYY-MM-DD` calendar day. Returns `None` for anything else.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Filters in the server's local time zone.
pub fn filter_events<'a>(events: &'a [Event], criteria: &FilterCriteria) -> Vec<&'a Event> {
    filter_events_in(events, criteria, &Local)
}

/// Stable filter: the relative order of `events` is preserved.
pub fn filter_events_in<'a, Tz: TimeZone>(
    events: &'a [Event],
    criteria: &FilterCriteria,
    tz: &Tz,
) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|event| criteria.matches_in(event, tz))
        .collect()
}

pub fn distinct_cities(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .map(|e| e.city.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn distinct_tags(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .flat_map(|e| e.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub cities: Vec<String>,
    pub tags: Vec<String>,
}

impl Facets {
    pub fn from_events(events: &[Event]) -> Self {
        Self {
            cities: distinct_cities(events),
            tags: distinct_tags(events),
        }
    }
}
