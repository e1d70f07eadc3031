//! Persistence ports.
//!
//! `EventStore` supplies the event catalogue and `KeyValueStore` holds the
//! per-profile demo state (points, RSVPs, redeemed discounts). Both have an
//! in-memory implementation for development and tests.

pub mod memory;
pub mod postgres;
pub mod seed;

use async_trait::async_trait;

use crate::error::BubbleResult;
use crate::models::Event;

pub use memory::{MemoryEventStore, MemoryKvStore};
pub use postgres::PgEventStore;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events, ascending by `occurs_at`.
    async fn list_events(&self) -> BubbleResult<Vec<Event>>;

    async fn get_event(&self, id: &str) -> BubbleResult<Option<Event>>;

    async fn create_event(&self, event: &Event) -> BubbleResult<()>;

    async fn count_events(&self) -> BubbleResult<u64>;
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> BubbleResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> BubbleResult<()>;

    /// Stores `value` for `ttl_seconds`.
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> BubbleResult<()>;

    async fn delete(&self, key: &str) -> BubbleResult<()>;
}

/// Fills an empty store with the demo catalogue. Returns the number of events inserted.
pub async fn seed_if_empty(store: &dyn EventStore) -> BubbleResult<usize> {
    if store.count_events().await? > 0 {
        return Ok(0);
    }

    let events = seed::demo_events(chrono::Utc::now());
    for event in &events {
        store.create_event(event).await?;
    }
    tracing::info!("Seeded {} demo events", events.len());
    Ok(events.len())
}
