use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PictiorError;
use crate::game::Stroke;

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// The `type` discriminator of an envelope. Closed set; anything else lands
/// on `Unknown` and is ignored by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Join,
    JoinRoom,
    Chat,
    Guess,
    StrokeUpdate,
    UpdatePlayer,
    StartGame,
    Heartbeat,
    // Server-originated kinds; ignored when a client sends them inbound.
    PlayerUpdate,
    GameState,
    Leave,
    #[serde(other)]
    Unknown,
}

/// The unit of all room communication. Every field except `type` is optional
/// on the wire; absent fields take defaults and handlers read the sub-paths
/// of `data` they care about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, rename = "userId")]
    pub user_id: String,
    #[serde(default, rename = "userName")]
    pub user_name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub timestamp: i64,
}

impl Envelope {
    /// Build a server-stamped envelope. The id is millisecond-derived, which
    /// keeps it monotonic-ish for client-side ordering.
    pub fn new(
        kind: MessageKind,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        let now = now_millis();
        Self {
            id: now.to_string(),
            kind,
            user_id: user_id.into(),
            user_name: user_name.into(),
            message: message.into(),
            data,
            timestamp: now,
        }
    }

    /// Build a system-originated envelope (snapshots, roster updates, ...).
    pub fn system(kind: MessageKind, message: impl Into<String>, data: Value) -> Self {
        Self::new(kind, "system", "System", message, data)
    }

    pub fn from_json(text: &str) -> Result<Self, PictiorError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Typed view of `data`, keyed by `type`. Join-family and update payloads
    /// tolerate missing fields (defaults apply); guess and stroke payloads
    /// must carry their documented shape or the envelope is dropped.
    pub fn payload(&self) -> Result<Payload, PictiorError> {
        Ok(match self.kind {
            MessageKind::Join | MessageKind::JoinRoom => {
                Payload::Join(serde_json::from_value(self.data.clone()).unwrap_or_default())
            }
            MessageKind::Chat => Payload::Chat,
            MessageKind::Guess => Payload::Guess(serde_json::from_value(self.data.clone())?),
            MessageKind::StrokeUpdate => {
                Payload::StrokeUpdate(serde_json::from_value(self.data.clone())?)
            }
            MessageKind::UpdatePlayer => {
                Payload::UpdatePlayer(serde_json::from_value(self.data.clone()).unwrap_or_default())
            }
            MessageKind::StartGame => Payload::StartGame(self.data.clone()),
            MessageKind::Heartbeat => Payload::Heartbeat,
            MessageKind::PlayerUpdate
            | MessageKind::GameState
            | MessageKind::Leave
            | MessageKind::Unknown => Payload::Ignored,
        })
    }
}

/// Per-kind payload, one variant per routed message type.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Join(JoinData),
    Chat,
    Guess(GuessData),
    StrokeUpdate(StrokeData),
    UpdatePlayer(UpdatePlayerData),
    /// Opaque settings blob, stored and echoed back verbatim.
    StartGame(Value),
    Heartbeat,
    /// Server-originated or unrecognized kinds arriving inbound.
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinData {
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub player_avatar: Option<String>,
    /// Legacy field some clients send instead of `playerAvatar`.
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GuessData {
    pub guess: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StrokeData {
    pub strokes: Vec<Stroke>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerData {
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub player_avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_envelope() {
        let text = r#"{
            "id": "1700000000000",
            "type": "guess",
            "userId": "player_1700000000000_abc123def",
            "userName": "Alice",
            "message": "pizza",
            "data": {"guess": "pizza"},
            "timestamp": 1700000000000
        }"#;
        let envelope = Envelope::from_json(text).unwrap();
        assert_eq!(envelope.kind, MessageKind::Guess);
        assert_eq!(envelope.user_name, "Alice");
        assert_eq!(
            envelope.payload().unwrap(),
            Payload::Guess(GuessData {
                guess: "pizza".to_string()
            })
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let envelope = Envelope::from_json(r#"{"type": "heartbeat"}"#).unwrap();
        assert_eq!(envelope.kind, MessageKind::Heartbeat);
        assert_eq!(envelope.id, "");
        assert_eq!(envelope.user_id, "");
        assert_eq!(envelope.timestamp, 0);
        assert!(envelope.data.is_null());
    }

    #[test]
    fn test_unrecognized_type_maps_to_unknown() {
        let envelope = Envelope::from_json(r#"{"type": "vote_kick"}"#).unwrap();
        assert_eq!(envelope.kind, MessageKind::Unknown);
        assert_eq!(envelope.payload().unwrap(), Payload::Ignored);
    }

    #[test]
    fn test_missing_type_is_an_error() {
        assert!(Envelope::from_json(r#"{"message": "hi"}"#).is_err());
        assert!(Envelope::from_json("not json at all").is_err());
    }

    #[test]
    fn test_join_payload_tolerates_malformed_data() {
        let envelope = Envelope::from_json(r#"{"type": "join", "data": 42}"#).unwrap();
        assert_eq!(envelope.payload().unwrap(), Payload::Join(JoinData::default()));
    }

    #[test]
    fn test_guess_payload_requires_guess_field() {
        let envelope = Envelope::from_json(r#"{"type": "guess", "data": {}}"#).unwrap();
        assert!(envelope.payload().is_err());
    }

    #[test]
    fn test_stroke_update_payload() {
        let envelope = Envelope::from_json(
            r##"{
                "type": "stroke_update",
                "data": {"strokes": [{"points": [], "color": "#fff", "width": 1.0, "type": "draw"}]}
            }"##,
        )
        .unwrap();
        match envelope.payload().unwrap() {
            Payload::StrokeUpdate(data) => assert_eq!(data.strokes.len(), 1),
            other => panic!("expected stroke payload, got {:?}", other),
        }
    }

    #[test]
    fn test_server_envelope_wire_shape() {
        let envelope = Envelope::system(
            MessageKind::PlayerUpdate,
            "player_update",
            json!({"players": []}),
        );
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["type"], "player_update");
        assert_eq!(json["userId"], "system");
        assert_eq!(json["userName"], "System");
        assert_eq!(json["id"], envelope.timestamp.to_string());
    }
}
