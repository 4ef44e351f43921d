//! Shared fixtures for unit tests: a small catalog vocabulary and string keys.

use serde::{Deserialize, Serialize};

use crate::domain::{EventKey, PayloadType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl User {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tracks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogEvent {
    UserCreated,
    PlaylistCreated,
}

impl EventKey for CatalogEvent {
    fn data_type(&self) -> PayloadType {
        match self {
            CatalogEvent::UserCreated => PayloadType::of::<User>(),
            CatalogEvent::PlaylistCreated => PayloadType::of::<Playlist>(),
        }
    }
}

/// 文字列タグのキー（payload は `String`）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event(pub &'static str);

impl EventKey for Event {
    fn data_type(&self) -> PayloadType {
        PayloadType::of::<String>()
    }
}

/// [`Event`] と同じ表現の別のキー型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtherEvent(pub &'static str);

impl EventKey for OtherEvent {
    fn data_type(&self) -> PayloadType {
        PayloadType::of::<String>()
    }
}
