//! Binary codec for the AMLL player/lyric-client protocol.
//!
//! One message is `[opcode: u16 LE][payload]` with no outer length envelope;
//! message boundaries belong to the transport. Encoding and decoding are pure
//! and hold no state, so they can be called from any thread.

mod error;
mod message;
mod record;
mod wire;

pub use error::{DecodeError, Result};
pub use message::{decode, decode_with, encode, DecodeOptions, Message, MessageKind, MusicInfo};
pub use record::{Artist, LyricLine, LyricWord};
pub use wire::{Reader, Wire};
