// Item types shared across stores

use serde::{Deserialize, Serialize};

/// An item being ranked (a film, an album, a player...)
///
/// Items originate in the backlog and move onto the grid as the user
/// places them. Equality is structural so snapshots can be compared
/// bit-for-bit in tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedItem {
    /// Stable identifier, unique within a list
    pub id: String,
    /// Display title
    pub title: String,
    /// Optional cover/poster URL for the UI layer
    pub image_url: Option<String>,
}

impl RankedItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: None,
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// A backlog entry: an item plus its placement status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogEntry {
    pub item: RankedItem,
    /// True once the item has been placed on the grid
    pub used: bool,
}

impl BacklogEntry {
    pub fn new(item: RankedItem) -> Self {
        Self { item, used: false }
    }
}
