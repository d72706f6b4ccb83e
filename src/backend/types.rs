use serde::{Deserialize, Serialize};

/// Table the listings live in
pub const LISTINGS_TABLE: &str = "listings";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
}

/// Row-level change notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: String,
    pub kind: ChangeKind,
    pub id: i64,
}

impl ChangeEvent {
    pub fn listings(kind: ChangeKind, id: i64) -> Self {
        Self {
            table: LISTINGS_TABLE.to_string(),
            kind,
            id,
        }
    }
}
