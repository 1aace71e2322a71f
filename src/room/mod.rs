pub mod directory;
pub mod player;
#[allow(clippy::module_inception)]
pub mod room;

pub use directory::RoomDirectory;
pub use player::{Player, DEFAULT_PLAYER_AVATAR, DEFAULT_PLAYER_NAME};
pub use room::Room;
