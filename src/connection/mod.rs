pub mod registry;

pub use registry::{ConnectionHandle, ConnectionRegistry};
