use std::collections::HashMap;

use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::protocol::{now_millis, Envelope};

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// One live transport connection: the owning room code plus the write half
/// of the socket, decoupled from the room roster.
#[derive(Debug)]
pub struct ConnectionHandle {
    pub room_code: String,
    pub sender: UnboundedSender<Message>,
}

impl ConnectionHandle {
    pub fn new(room_code: impl Into<String>, sender: UnboundedSender<Message>) -> Self {
        Self {
            room_code: room_code.into(),
            sender,
        }
    }
}

/// Registry of every live connection, keyed by connection id. Delivery is
/// at-most-once and fire-and-forget: a send to an unknown or closed
/// connection is a silent drop, never an error.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<String, ConnectionHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and hand back its freshly generated id.
    pub fn register(&mut self, handle: ConnectionHandle) -> String {
        let id = generate_connection_id();
        self.connections.insert(id.clone(), handle);
        id
    }

    pub fn unregister(&mut self, id: &str) -> Option<ConnectionHandle> {
        self.connections.remove(id)
    }

    pub fn lookup(&self, id: &str) -> Option<&ConnectionHandle> {
        self.connections.get(id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Unicast a raw frame. Returns false if the connection is gone.
    pub fn send_text(&self, id: &str, text: &str) -> bool {
        match self.connections.get(id) {
            Some(handle) => handle.sender.send(Message::Text(text.to_string())).is_ok(),
            None => false,
        }
    }

    /// Unicast an envelope, serializing it to the wire shape.
    pub fn send(&self, id: &str, envelope: &Envelope) -> bool {
        match serde_json::to_string(envelope) {
            Ok(text) => self.send_text(id, &text),
            Err(e) => {
                tracing::warn!("Failed to serialize envelope for {}: {}", id, e);
                false
            }
        }
    }
}

/// Generate a process-unique connection id: a millisecond timestamp combined
/// with 9 random base-36 characters, e.g. `player_1700000000000_k3f9a01xq`.
fn generate_connection_id() -> String {
    let suffix: String = Uuid::new_v4()
        .into_bytes()
        .iter()
        .take(ID_SUFFIX_LEN)
        .map(|b| ID_ALPHABET[(b % 36) as usize] as char)
        .collect();
    format!("player_{}_{}", now_millis(), suffix)
}
