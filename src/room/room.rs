use indexmap::IndexMap;

use crate::game::{scoring, GameState, GuessOutcome};
use crate::room::Player;

/// One isolated game session: the player roster plus the shared game state.
/// Rooms are the unit of broadcast and the only shared mutable resource.
///
/// The roster keeps insertion order; the front-end's "host = first entry"
/// heuristic reads that order, the server attaches no meaning to it.
#[derive(Debug, Default)]
pub struct Room {
    players: IndexMap<String, Player>,
    pub game_state: GameState,
}

impl Room {
    pub fn new() -> Self {
        Self {
            players: IndexMap::new(),
            game_state: GameState::new(),
        }
    }

    /// Insert or replace a player. Re-joining with the same id resets the
    /// roster entry (including the cached score) like a fresh join.
    pub fn upsert_player(&mut self, player: Player) {
        self.players.insert(player.id.clone(), player);
    }

    pub fn remove_player(&mut self, id: &str) -> Option<Player> {
        self.players.shift_remove(id)
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &str> {
        self.players.keys().map(String::as_str)
    }

    /// Roster in join order.
    pub fn roster(&self) -> Vec<&Player> {
        self.players.values().collect()
    }

    /// Evaluate a guess and, on an award, refresh the player's cached score
    /// from the score table.
    pub fn evaluate_guess(&mut self, player_id: &str, guess: &str) -> GuessOutcome {
        let outcome = scoring::evaluate(&mut self.game_state, player_id, guess);
        if matches!(outcome, GuessOutcome::Correct { .. }) {
            if let Some(player) = self.players.get_mut(player_id) {
                player.score = self.game_state.scores.get(player_id).copied().unwrap_or(0);
            }
        }
        outcome
    }
}
