//! Avatar sprite catalog
//!
//! A fixed set of sprite keys the presentation layer maps to artwork.
//! Unknown keys are rejected at update time so a saved collection never
//! references art that does not ship with the app.

/// A catalog entry: stable key plus human-readable name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    /// Stable key stored on plant records
    pub key: &'static str,
    /// Name shown when picking an avatar
    pub display_name: &'static str,
}

/// All available sprites, in display order
pub const SPRITES: [Sprite; 2] = [
    Sprite {
        key: "sprout",
        display_name: "Sprout",
    },
    Sprite {
        key: "tree",
        display_name: "Tree",
    },
];

/// Sprite assigned to newly added plants
pub const DEFAULT_SPRITE: &str = "sprout";

/// Look up a catalog entry by key
pub fn find(key: &str) -> Option<&'static Sprite> {
    SPRITES.iter().find(|s| s.key == key)
}

/// Whether a key exists in the catalog
pub fn is_known(key: &str) -> bool {
    find(key).is_some()
}
