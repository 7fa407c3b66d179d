//! Plant records and care updates
//!
//! `Plant` is the single persisted record type. Field names serialize as
//! camelCase (`speciesId`, `lastWatered`, ...) so the on-disk JSON stays
//! readable by collections written before this implementation.
//!
//! Care timestamps are opaque strings. Callers have historically written
//! both date-only (`2024-03-01`) and full RFC 3339 forms; the registry
//! stores and clears them without ever parsing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sprites;

const ID_SUFFIX_LEN: usize = 7;
const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A plant in the user's collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    /// Unique id: UNIX millis in base36, a hyphen, then a random suffix
    pub id: String,
    /// User-chosen label; trimmed, never empty
    pub nickname: String,
    /// Species database id, when a species was attached
    #[serde(default)]
    pub species_id: Option<i64>,
    /// Common name from the species lookup
    #[serde(default)]
    pub species_name: Option<String>,
    /// Scientific name (first entry when the database lists several)
    #[serde(default)]
    pub scientific_name: Option<String>,
    /// Watering guidance text, stored verbatim
    #[serde(default)]
    pub watering: Option<String>,
    /// Sunlight guidance; empty when the species data had none
    #[serde(default)]
    pub sunlight: Vec<String>,
    /// Life cycle (annual, perennial, ...)
    #[serde(default)]
    pub cycle: Option<String>,
    /// Avatar key from the sprite catalog
    #[serde(default = "default_sprite")]
    pub sprite: String,
    /// Small image URL from the species lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// When the plant was last watered; `None` means never recorded
    #[serde(default)]
    pub last_watered: Option<String>,
    /// When pests were last treated; `None` means never recorded
    #[serde(default)]
    pub last_pest_treatment: Option<String>,
}

fn default_sprite() -> String {
    sprites::DEFAULT_SPRITE.to_string()
}

impl Plant {
    /// Build a record from a nickname, an optional species pick, and a
    /// sprite key. Trims the nickname; care fields start at never.
    pub fn new(nickname: &str, species: Option<SpeciesSummary>, sprite: &str) -> Self {
        let species = species.unwrap_or_default();
        Self {
            id: generate_id(),
            nickname: nickname.trim().to_string(),
            species_id: species.species_id,
            species_name: species.common_name,
            scientific_name: species.scientific_name,
            watering: species.watering,
            sunlight: species.sunlight,
            cycle: species.cycle,
            sprite: sprite.to_string(),
            thumbnail: species.thumbnail,
            last_watered: None,
            last_pest_treatment: None,
        }
    }
}

/// Normalized species metadata, as returned by a search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesSummary {
    /// Species database id
    pub species_id: Option<i64>,
    /// Common name
    pub common_name: Option<String>,
    /// Scientific name (first entry when the database lists several)
    pub scientific_name: Option<String>,
    /// Watering guidance
    pub watering: Option<String>,
    /// Sunlight guidance
    #[serde(default)]
    pub sunlight: Vec<String>,
    /// Life cycle
    pub cycle: Option<String>,
    /// Small image URL
    pub thumbnail: Option<String>,
}

/// A single care-field mutation
///
/// `Some` sets a timestamp, `None` clears it back to never. The two are
/// distinct inputs: clearing is a real mutation, not an omission.
#[derive(Debug, Clone, PartialEq)]
pub enum CareUpdate {
    /// Set or clear the last-watered timestamp
    LastWatered(Option<String>),
    /// Set or clear the last-pest-treatment timestamp
    LastPestTreatment(Option<String>),
    /// Replace the avatar sprite (must be a catalog key)
    Sprite(String),
}

/// Generate a collision-resistant id: time component plus random suffix
fn generate_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())] as char)
        .collect();
    format!("{}-{}", base36(millis), suffix)
}

fn base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
