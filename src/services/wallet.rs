//! Per-profile demo state: Bubble Points balance, RSVPs and redeemed discounts.
//!
//! Everything lives in the key-value store under `bubble:{profile}:{field}`
//! as JSON, decoded into typed collections here. Operations on one profile
//! are serialised; the balance and the redeemed set share a single key so a
//! redemption is one write.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;
use validator::Validate;

use crate::config::WalletConfig;
use crate::error::{BubbleError, BubbleResult};
use crate::models::{Discount, Event, Profile, WalletSummary};
use crate::store::KeyValueStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Balance {
    points: u32,
    used_discounts: BTreeSet<String>,
}

#[derive(Clone)]
pub struct WalletService {
    kv: Arc<dyn KeyValueStore>,
    config: WalletConfig,
    discounts: Vec<Discount>,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

fn key(profile: &str, field: &str) -> String {
    format!("bubble:{}:{}", profile, field)
}

impl WalletService {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        config: WalletConfig,
        discounts: Vec<Discount>,
    ) -> Self {
        Self {
            kv,
            config,
            discounts,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn discounts(&self) -> &[Discount] {
        &self.discounts
    }

    async fn lock_profile(&self, profile: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .lock()
            .await
            .entry(profile.to_string())
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    async fn load<T: DeserializeOwned>(
        &self,
        profile: &str,
        field: &str,
    ) -> BubbleResult<Option<T>> {
        match self.kv.get(&key(profile, field)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn store<T: Serialize + ?Sized>(
        &self,
        profile: &str,
        field: &str,
        value: &T,
    ) -> BubbleResult<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(&key(profile, field), &raw).await
    }

    // Callers hold the profile lock.
    async fn load_balance(&self, profile: &str) -> BubbleResult<Balance> {
        if let Some(balance) = self.load(profile, "balance").await? {
            return Ok(balance);
        }
        let balance = Balance {
            points: self.config.seed_points,
            used_discounts: BTreeSet::new(),
        };
        self.store(profile, "balance", &balance).await?;
        Ok(balance)
    }

    // Callers hold the profile lock.
    async fn load_rsvps(&self, profile: &str) -> BubbleResult<Vec<String>> {
        if let Some(rsvps) = self.load(profile, "rsvps").await? {
            return Ok(rsvps);
        }
        self.store(profile, "rsvps", &self.config.seed_rsvps).await?;
        Ok(self.config.seed_rsvps.clone())
    }

    /// Current balance; the first read seeds the configured starting balance.
    pub async fn points(&self, profile: &str) -> BubbleResult<u32> {
        let _guard = self.lock_profile(profile).await;
        Ok(self.load_balance(profile).await?.points)
    }

    /// RSVPed event ids in the order they were made; the first read seeds the demo list.
    pub async fn rsvps(&self, profile: &str) -> BubbleResult<Vec<String>> {
        let _guard = self.lock_profile(profile).await;
        self.load_rsvps(profile).await
    }

    pub async fn used_discounts(&self, profile: &str) -> BubbleResult<BTreeSet<String>> {
        let _guard = self.lock_profile(profile).await;
        Ok(self.load_balance(profile).await?.used_discounts)
    }

    pub async fn profile(&self, profile: &str) -> BubbleResult<Option<Profile>> {
        self.load(profile, "profile").await
    }

    pub async fn summary(&self, profile: &str) -> BubbleResult<WalletSummary> {
        let _guard = self.lock_profile(profile).await;
        let balance = self.load_balance(profile).await?;
        Ok(WalletSummary {
            profile: self.load(profile, "profile").await?,
            points: balance.points,
            rsvps: self.load_rsvps(profile).await?,
            used_discounts: balance.used_discounts,
        })
    }

    pub async fn save_profile(&self, profile: &str, doc: &Profile) -> BubbleResult<()> {
        doc.validate()?;
        self.store(profile, "profile", doc).await
    }

    /// Forgets the saved profile document; points and RSVPs are kept.
    pub async fn sign_out(&self, profile: &str) -> BubbleResult<()> {
        self.kv.delete(&key(profile, "profile")).await
    }

    /// Returns `true` when the RSVP was added, `false` if it already existed.
    pub async fn rsvp(&self, profile: &str, event: &Event) -> BubbleResult<bool> {
        let _guard = self.lock_profile(profile).await;
        let mut rsvps = self.load_rsvps(profile).await?;
        if rsvps.iter().any(|id| id == &event.id) {
            return Ok(false);
        }
        rsvps.push(event.id.clone());
        self.store(profile, "rsvps", &rsvps).await?;
        info!("Profile {} RSVPed to event {}", profile, event.id);
        Ok(true)
    }

    /// Returns `true` when an RSVP was removed.
    pub async fn cancel_rsvp(&self, profile: &str, event_id: &str) -> BubbleResult<bool> {
        let _guard = self.lock_profile(profile).await;
        let mut rsvps = self.load_rsvps(profile).await?;
        let before = rsvps.len();
        rsvps.retain(|id| id != event_id);
        if rsvps.len() == before {
            return Ok(false);
        }
        self.store(profile, "rsvps", &rsvps).await?;
        Ok(true)
    }

    /// Spends points on a discount and returns the remaining balance.
    pub async fn redeem(&self, profile: &str, discount_id: &str) -> BubbleResult<u32> {
        let discount = self
            .discounts
            .iter()
            .find(|d| d.id == discount_id)
            .ok_or_else(|| BubbleError::DiscountNotFound(discount_id.to_string()))?;

        let _guard = self.lock_profile(profile).await;
        let mut balance = self.load_balance(profile).await?;
        if balance.used_discounts.contains(&discount.id) {
            return Err(BubbleError::DiscountAlreadyUsed(discount.id.clone()));
        }
        if balance.points < discount.cost_points {
            return Err(BubbleError::InsufficientPoints {
                balance: balance.points,
                cost: discount.cost_points,
            });
        }

        balance.points -= discount.cost_points;
        balance.used_discounts.insert(discount.id.clone());
        self.store(profile, "balance", &balance).await?;

        info!(
            "Profile {} redeemed {} for event {}, {} points remaining",
            profile, discount.id, discount.event_id, balance.points
        );
        Ok(balance.points)
    }
}
