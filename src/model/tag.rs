use serde::Serialize;

/// Color given to tags created without one
pub const DEFAULT_TAG_COLOR: &str = "#808080";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
}
