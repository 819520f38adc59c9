//! WebSocket transport for the codec: one encoded message per binary
//! WebSocket message.

pub mod client;
pub mod session;

pub use client::{Client, ClientConfig, ConnectionStatus};
pub use session::{run_session, send_message, SessionConfig, SessionHandler};
