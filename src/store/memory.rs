use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::{EventStore, KeyValueStore};
use crate::error::BubbleResult;
use crate::models::Event;

/// Event catalogue held in memory, kept sorted by `occurs_at`.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    events: Arc<RwLock<Vec<Event>>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(mut events: Vec<Event>) -> Self {
        events.sort_by_key(|e| e.occurs_at);
        Self {
            events: Arc::new(RwLock::new(events)),
        }
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn list_events(&self) -> BubbleResult<Vec<Event>> {
        Ok(self.events.read().await.clone())
    }

    async fn get_event(&self, id: &str) -> BubbleResult<Option<Event>> {
        Ok(self.events.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn create_event(&self, event: &Event) -> BubbleResult<()> {
        let mut events = self.events.write().await;
        // after any existing event at the same instant, like an ORDER BY on insert order
        let at = events.partition_point(|e| e.occurs_at <= event.occurs_at);
        events.insert(at, event.clone());
        Ok(())
    }

    async fn count_events(&self) -> BubbleResult<u64> {
        Ok(self.events.read().await.len() as u64)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self) -> bool {
        self.expires_at.map_or(true, |at| Instant::now() < at)
    }
}

/// Key-value store held in memory; expired entries are dropped lazily on read.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> BubbleResult<Option<String>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.is_live() => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }
        self.entries.write().await.remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str) -> BubbleResult<()> {
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> BubbleResult<()> {
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> BubbleResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
