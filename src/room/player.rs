use serde::{Deserialize, Serialize};

use crate::protocol::now_millis;

pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";
pub const DEFAULT_PLAYER_AVATAR: &str = "🐱";

/// One participant inside one room. The id is the same value as the player's
/// connection id; the entry is deleted from the roster on disconnect, not
/// merely marked offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub is_online: bool,
    pub is_drawer: bool,
    /// Redundant cache of the room's score table, kept for client convenience.
    pub score: u32,
    pub joined_at: i64,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: avatar.into(),
            is_online: true,
            is_drawer: false,
            score: 0,
            joined_at: now_millis(),
        }
    }
}
