use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// Saved settings document of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub major: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default = "default_true")]
    pub event_recos: bool,
    #[serde(default = "default_true")]
    pub reminders: bool,
    #[serde(default = "default_openness")]
    #[validate(range(max = 100))]
    pub openness: u8,
}

fn default_true() -> bool {
    true
}

fn default_openness() -> u8 {
    70
}

/// A perk attached to an event that can be bought with Bubble Points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub id: String,
    pub event_id: String,
    pub label: String,
    pub cost_points: u32,
}

impl Discount {
    pub fn demo_catalogue() -> Vec<Discount> {
        vec![
            Discount {
                id: "d1".to_string(),
                event_id: "5".to_string(),
                label: "20% off".to_string(),
                cost_points: 50,
            },
            Discount {
                id: "d2".to_string(),
                event_id: "7".to_string(),
                label: "Free swag pack".to_string(),
                cost_points: 30,
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub profile: Option<Profile>,
    pub points: u32,
    pub rsvps: Vec<String>,
    pub used_discounts: BTreeSet<String>,
}
