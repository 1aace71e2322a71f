use std::collections::HashMap;

use crate::room::Room;

/// Mapping from room code to room state. Rooms are created lazily on the
/// first connection referencing an unseen code and are never evicted: their
/// lifetime is the process lifetime, matching existing deployments.
///
/// Codes are taken verbatim from the connection path — case-sensitive, no
/// trimming. Intentional, to preserve wire compatibility.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<String, Room>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, room_code: &str) -> &mut Room {
        self.rooms
            .entry(room_code.to_string())
            .or_insert_with(Room::new)
    }

    pub fn get(&self, room_code: &str) -> Option<&Room> {
        self.rooms.get(room_code)
    }

    pub fn get_mut(&mut self, room_code: &str) -> Option<&mut Room> {
        self.rooms.get_mut(room_code)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::Player;

    #[test]
    fn test_get_or_create_creates_once() {
        let mut directory = RoomDirectory::new();
        assert!(directory.get("abcde").is_none());

        directory.get_or_create("abcde").upsert_player(Player::new("p1", "Alice", "🐱"));
        assert_eq!(directory.room_count(), 1);

        // Second call returns the same room, not a fresh one.
        assert_eq!(directory.get_or_create("abcde").player_count(), 1);
        assert_eq!(directory.room_count(), 1);
    }

    #[test]
    fn test_room_codes_are_case_sensitive() {
        let mut directory = RoomDirectory::new();
        directory.get_or_create("abcde");
        directory.get_or_create("ABCDE");
        assert_eq!(directory.room_count(), 2);
        assert!(directory.get("abcde").is_some());
        assert!(directory.get("Abcde").is_none());
    }

    #[test]
    fn test_rooms_are_isolated() {
        let mut directory = RoomDirectory::new();
        directory.get_or_create("one").upsert_player(Player::new("p1", "Alice", "🐱"));
        directory.get_or_create("two");

        assert_eq!(directory.get("one").unwrap().player_count(), 1);
        assert_eq!(directory.get("two").unwrap().player_count(), 0);
    }
}
