use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// A 2-D canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeKind {
    Draw,
    Eraser,
    Shape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
}

/// One drawn stroke. Immutable once received; the room's stroke list is
/// replaced wholesale on every `stroke_update`, never merged server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub width: f64,
    #[serde(rename = "type")]
    pub kind: StrokeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<Point>,
}

/// One chat-transcript entry, kept in the room so late joiners get history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMessage {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub message: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Waiting,
    Playing,
    Finished,
}

/// Shared per-room game state, serialized verbatim as the `game_state`
/// snapshot payload. Field names stay camelCase on the wire for client
/// compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub current_word: String,
    pub time_left: u32,
    pub current_drawer: Option<String>,
    pub scores: HashMap<String, u32>,
    pub strokes: Vec<Stroke>,
    pub messages: Vec<GameMessage>,
    pub current_round: u32,
    pub total_rounds: u32,
    pub round_start_time: i64,
    pub correct_guesses: Vec<String>,
    pub game_status: GameStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_settings: Option<serde_json::Value>,
    /// Membership index over `correct_guesses`; not part of the wire shape.
    #[serde(skip)]
    correct_index: HashSet<String>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            current_word: String::new(),
            time_left: 60,
            current_drawer: None,
            scores: HashMap::new(),
            strokes: Vec::new(),
            messages: Vec::new(),
            current_round: 1,
            total_rounds: 5,
            round_start_time: 0,
            correct_guesses: Vec::new(),
            game_status: GameStatus::Waiting,
            game_settings: None,
            correct_index: HashSet::new(),
        }
    }

    /// Whether this player has already been credited this round.
    pub fn has_guessed_correctly(&self, player_id: &str) -> bool {
        self.correct_index.contains(player_id)
    }

    /// Record a correct guess, keeping the ordered list and the index in sync.
    /// Returns false (and records nothing) if the player is already credited.
    pub fn record_correct_guess(&mut self, player_id: &str) -> bool {
        if !self.correct_index.insert(player_id.to_string()) {
            return false;
        }
        self.correct_guesses.push(player_id.to_string());
        true
    }

    pub fn push_message(&mut self, message: GameMessage) {
        self.messages.push(message);
    }

    /// Start a new guessing round: replace the word and clear the per-round
    /// correct-guess ledger. Word selection itself happens outside the relay;
    /// scores are never reset here.
    pub fn begin_round(&mut self, word: impl Into<String>) {
        self.current_word = word.into();
        self.correct_guesses.clear();
        self.correct_index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.current_word, "");
        assert_eq!(state.time_left, 60);
        assert_eq!(state.current_drawer, None);
        assert_eq!(state.current_round, 1);
        assert_eq!(state.total_rounds, 5);
        assert_eq!(state.game_status, GameStatus::Waiting);
        assert!(state.scores.is_empty());
        assert!(state.game_settings.is_none());
    }

    #[test]
    fn test_record_correct_guess_is_idempotent() {
        let mut state = GameState::new();
        assert!(state.record_correct_guess("p1"));
        assert!(!state.record_correct_guess("p1"));
        assert_eq!(state.correct_guesses, vec!["p1".to_string()]);
        assert!(state.has_guessed_correctly("p1"));
        assert!(!state.has_guessed_correctly("p2"));
    }

    #[test]
    fn test_snapshot_wire_shape() {
        let state = GameState::new();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["currentWord"], "");
        assert_eq!(json["timeLeft"], 60);
        assert_eq!(json["currentDrawer"], serde_json::Value::Null);
        assert_eq!(json["gameStatus"], "waiting");
        assert_eq!(json["roundStartTime"], 0);
        // Absent until start_game stores it.
        assert!(json.get("gameSettings").is_none());
        // The membership index never leaks onto the wire.
        assert!(json.get("correctIndex").is_none());
    }

    #[test]
    fn test_stroke_wire_shape() {
        let json = r##"{
            "points": [{"x": 1.0, "y": 2.0}, {"x": 3.0, "y": 4.0}],
            "color": "#ff0000",
            "width": 4.0,
            "type": "shape",
            "shape": "circle",
            "startPoint": {"x": 1.0, "y": 2.0}
        }"##;
        let stroke: Stroke = serde_json::from_str(json).unwrap();
        assert_eq!(stroke.kind, StrokeKind::Shape);
        assert_eq!(stroke.shape, Some(ShapeKind::Circle));
        assert_eq!(stroke.points.len(), 2);

        let round_tripped = serde_json::to_value(&stroke).unwrap();
        assert_eq!(round_tripped["type"], "shape");
        assert_eq!(round_tripped["startPoint"]["x"], 1.0);
    }

    #[test]
    fn test_freehand_stroke_omits_shape_fields() {
        let stroke = Stroke {
            points: vec![Point { x: 0.0, y: 0.0 }],
            color: "#000000".to_string(),
            width: 2.0,
            kind: StrokeKind::Draw,
            shape: None,
            start_point: None,
        };
        let json = serde_json::to_value(&stroke).unwrap();
        assert!(json.get("shape").is_none());
        assert!(json.get("startPoint").is_none());
    }
}
