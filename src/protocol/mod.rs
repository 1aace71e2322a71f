pub mod envelope;

pub use envelope::{
    now_millis, Envelope, GuessData, JoinData, MessageKind, Payload, StrokeData, UpdatePlayerData,
};
