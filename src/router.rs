//! Message router / broadcast engine: interprets inbound envelopes, mutates
//! room state, and fans the results out to the room's live connections.
//!
//! Everything here is deliberately permissive: unknown kinds are ignored,
//! handlers that need missing state return without effect, and delivery is
//! best-effort fire-and-forget. Nothing propagates an error upward.

use serde_json::json;

use crate::connection::ConnectionRegistry;
use crate::game::{GameMessage, GameStatus, GuessOutcome};
use crate::protocol::{
    now_millis, Envelope, JoinData, MessageKind, Payload, UpdatePlayerData,
};
use crate::room::{Player, Room, RoomDirectory, DEFAULT_PLAYER_AVATAR, DEFAULT_PLAYER_NAME};

/// Dispatch one inbound envelope on behalf of `sender_id`.
pub fn dispatch(
    rooms: &mut RoomDirectory,
    connections: &ConnectionRegistry,
    room_code: &str,
    sender_id: &str,
    envelope: Envelope,
) {
    let Some(room) = rooms.get_mut(room_code) else {
        return;
    };

    let payload = match envelope.payload() {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Dropping malformed {:?} from {}: {}", envelope.kind, sender_id, e);
            return;
        }
    };

    match payload {
        Payload::Join(data) => handle_join(room, connections, sender_id, &envelope, data),
        Payload::Chat => {
            room.game_state.push_message(transcript_entry(&envelope));
            broadcast(connections, room, &envelope, None);
        }
        Payload::Guess(data) => {
            handle_guess(room, connections, sender_id, &envelope, &data.guess)
        }
        Payload::StrokeUpdate(data) => {
            room.game_state.strokes = data.strokes;
            broadcast(connections, room, &envelope, Some(sender_id));
        }
        Payload::UpdatePlayer(data) => handle_update_player(room, connections, sender_id, data),
        Payload::StartGame(settings) => {
            handle_start_game(room, connections, sender_id, &envelope, settings)
        }
        Payload::Heartbeat => {
            let reply = Envelope::system(
                MessageKind::Heartbeat,
                "heartbeat",
                json!({ "timestamp": now_millis() }),
            );
            connections.send(sender_id, &reply);
        }
        Payload::Ignored => {
            tracing::debug!("Ignoring {:?} from {}", envelope.kind, sender_id);
        }
    }
}

/// Transport-close cleanup: delete the player and tell the survivors.
pub fn handle_disconnect(
    rooms: &mut RoomDirectory,
    connections: &ConnectionRegistry,
    room_code: &str,
    player_id: &str,
) {
    let Some(room) = rooms.get_mut(room_code) else {
        return;
    };
    let Some(player) = room.remove_player(player_id) else {
        return;
    };

    let leave = Envelope::new(
        MessageKind::Leave,
        player_id,
        &player.name,
        format!("{} left the game", player.name),
        json!({}),
    );
    broadcast(connections, room, &leave, None);
    broadcast_player_list(connections, room);
}

fn handle_join(
    room: &mut Room,
    connections: &ConnectionRegistry,
    sender_id: &str,
    envelope: &Envelope,
    data: JoinData,
) {
    let name = first_non_empty([data.player_name.as_deref(), Some(envelope.user_name.as_str())])
        .unwrap_or(DEFAULT_PLAYER_NAME)
        .to_string();
    let avatar = first_non_empty([data.player_avatar.as_deref(), data.avatar.as_deref()])
        .unwrap_or(DEFAULT_PLAYER_AVATAR)
        .to_string();

    room.upsert_player(Player::new(sender_id, &name, &avatar));
    tracing::info!("Player {} ({}) joined", name, sender_id);

    let announcement = Envelope::new(
        MessageKind::Join,
        sender_id,
        &name,
        format!("{} joined the game", name),
        json!({ "playerName": name, "playerAvatar": avatar }),
    );
    broadcast(connections, room, &announcement, None);

    send_snapshot(connections, room, sender_id);
    broadcast_player_list(connections, room);
}

fn handle_guess(
    room: &mut Room,
    connections: &ConnectionRegistry,
    sender_id: &str,
    envelope: &Envelope,
    guess: &str,
) {
    match room.evaluate_guess(sender_id, guess) {
        GuessOutcome::Correct { word, points, .. } => {
            let success = Envelope::new(
                MessageKind::Guess,
                sender_id,
                &envelope.user_name,
                format!("🎉 Correct! \"{}\" (+{} points)", word, points),
                json!({ "guess": guess, "isCorrect": true, "points": points }),
            );
            room.game_state.push_message(transcript_entry(&success));
            broadcast(connections, room, &success, None);
        }
        GuessOutcome::Incorrect => {
            // Relaying the wrong guess verbatim is what shows it in chat.
            room.game_state.push_message(transcript_entry(envelope));
            broadcast(connections, room, envelope, None);
        }
        GuessOutcome::Inactive => {}
    }
}

fn handle_update_player(
    room: &mut Room,
    connections: &ConnectionRegistry,
    sender_id: &str,
    data: UpdatePlayerData,
) {
    let Some(player) = room.player_mut(sender_id) else {
        return;
    };

    let mut updated = false;
    if let Some(name) = data.player_name.filter(|n| !n.is_empty()) {
        if player.name != name {
            tracing::info!("Player {} renamed to {}", sender_id, name);
            player.name = name;
            updated = true;
        }
    }
    if let Some(avatar) = data.player_avatar.filter(|a| !a.is_empty()) {
        if player.avatar != avatar {
            player.avatar = avatar;
            updated = true;
        }
    }

    if updated {
        broadcast_player_list(connections, room);
    }
}

fn handle_start_game(
    room: &mut Room,
    connections: &ConnectionRegistry,
    sender_id: &str,
    envelope: &Envelope,
    settings: serde_json::Value,
) {
    tracing::info!("Game started by {}", sender_id);

    let game = &mut room.game_state;
    game.game_status = GameStatus::Playing;
    game.game_settings = Some(settings.clone());
    game.current_round = 1;
    game.round_start_time = now_millis();

    let echo = Envelope::new(
        MessageKind::StartGame,
        sender_id,
        &envelope.user_name,
        "Game started!",
        settings,
    );
    broadcast(connections, room, &echo, None);
    broadcast_snapshot(connections, room);
}

/// Fan an envelope out to every registered connection of the room's roster,
/// optionally excluding the sending player. Each delivery is independent and
/// best-effort; unreachable players are silently skipped.
fn broadcast(
    connections: &ConnectionRegistry,
    room: &Room,
    envelope: &Envelope,
    exclude: Option<&str>,
) {
    let text = match serde_json::to_string(envelope) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Failed to serialize {:?} broadcast: {}", envelope.kind, e);
            return;
        }
    };
    for id in room.player_ids() {
        if exclude.is_some_and(|excluded| excluded == id) {
            continue;
        }
        connections.send_text(id, &text);
    }
}

fn broadcast_player_list(connections: &ConnectionRegistry, room: &Room) {
    let update = Envelope::system(
        MessageKind::PlayerUpdate,
        "player_update",
        json!({ "players": room.roster() }),
    );
    broadcast(connections, room, &update, None);
}

fn send_snapshot(connections: &ConnectionRegistry, room: &Room, player_id: &str) {
    connections.send(player_id, &snapshot_envelope(room));
}

fn broadcast_snapshot(connections: &ConnectionRegistry, room: &Room) {
    broadcast(connections, room, &snapshot_envelope(room), None);
}

fn snapshot_envelope(room: &Room) -> Envelope {
    let data = serde_json::to_value(&room.game_state).unwrap_or(serde_json::Value::Null);
    Envelope::system(MessageKind::GameState, "game_state", data)
}

fn transcript_entry(envelope: &Envelope) -> GameMessage {
    GameMessage {
        id: envelope.id.clone(),
        user_id: envelope.user_id.clone(),
        user_name: envelope.user_name.clone(),
        message: envelope.message.clone(),
        timestamp: envelope.timestamp,
    }
}

fn first_non_empty<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
}
