use super::error::{DecodeError, Result};
use super::record::{Artist, LyricLine};
use super::wire::{Reader, Wire};
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Message kinds and their wire opcodes.
///
/// The discriminant is the opcode; it must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageKind {
    Ping = 0,
    Pong = 1,
    SetMusicInfo = 2,
    SetMusicAlbumCoverImageUri = 3,
    SetMusicAlbumCoverImageData = 4,
    OnPlayProgress = 5,
    OnVolumeChanged = 6,
    OnPaused = 7,
    OnResumed = 8,
    OnAudioData = 9,
    SetLyric = 10,
    SetLyricFromTtml = 11,
    Pause = 12,
    Resume = 13,
    ForwardSong = 14,
    BackwardSong = 15,
    SetVolume = 16,
    SeekPlayProgress = 17,
}

impl MessageKind {
    /// All kinds, indexed by opcode.
    pub const ALL: [MessageKind; 18] = [
        MessageKind::Ping,
        MessageKind::Pong,
        MessageKind::SetMusicInfo,
        MessageKind::SetMusicAlbumCoverImageUri,
        MessageKind::SetMusicAlbumCoverImageData,
        MessageKind::OnPlayProgress,
        MessageKind::OnVolumeChanged,
        MessageKind::OnPaused,
        MessageKind::OnResumed,
        MessageKind::OnAudioData,
        MessageKind::SetLyric,
        MessageKind::SetLyricFromTtml,
        MessageKind::Pause,
        MessageKind::Resume,
        MessageKind::ForwardSong,
        MessageKind::BackwardSong,
        MessageKind::SetVolume,
        MessageKind::SeekPlayProgress,
    ];

    pub const fn opcode(self) -> u16 {
        self as u16
    }

    pub fn from_opcode(opcode: u16) -> Option<Self> {
        Self::ALL
            .get(opcode as usize)
            .copied()
            .filter(|kind| kind.opcode() == opcode)
    }

    /// The camelCase name hosts use for this kind, e.g. `setMusicInfo`.
    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Ping => "ping",
            MessageKind::Pong => "pong",
            MessageKind::SetMusicInfo => "setMusicInfo",
            MessageKind::SetMusicAlbumCoverImageUri => "setMusicAlbumCoverImageURI",
            MessageKind::SetMusicAlbumCoverImageData => "setMusicAlbumCoverImageData",
            MessageKind::OnPlayProgress => "onPlayProgress",
            MessageKind::OnVolumeChanged => "onVolumeChanged",
            MessageKind::OnPaused => "onPaused",
            MessageKind::OnResumed => "onResumed",
            MessageKind::OnAudioData => "onAudioData",
            MessageKind::SetLyric => "setLyric",
            MessageKind::SetLyricFromTtml => "setLyricFromTTML",
            MessageKind::Pause => "pause",
            MessageKind::Resume => "resume",
            MessageKind::ForwardSong => "forwardSong",
            MessageKind::BackwardSong => "backwardSong",
            MessageKind::SetVolume => "setVolume",
            MessageKind::SeekPlayProgress => "seekPlayProgress",
        }
    }

    /// Whether a message of this kind carries no payload after the opcode.
    pub fn is_bare(self) -> bool {
        Message::bare(self).is_some()
    }
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MessageKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| DecodeError::UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicInfo {
    pub music_id: String,
    pub music_name: String,
    pub album_id: String,
    pub album_name: String,
    pub artists: Vec<Artist>,
    /// Milliseconds.
    pub duration: u64,
}

impl Wire for MusicInfo {
    fn encode(&self, buf: &mut BytesMut) {
        self.music_id.encode(buf);
        self.music_name.encode(buf);
        self.album_id.encode(buf);
        self.album_name.encode(buf);
        self.artists.encode(buf);
        self.duration.encode(buf);
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(MusicInfo {
            music_id: String::decode(reader)?,
            music_name: String::decode(reader)?,
            album_id: String::decode(reader)?,
            album_name: String::decode(reader)?,
            artists: reader.read_vec()?,
            duration: reader.read_u64()?,
        })
    }
}

/// A protocol message exchanged between the lyric client and the player host.
///
/// Progress values are milliseconds, volumes are `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(
    tag = "type",
    content = "value",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Message {
    Ping,
    Pong,
    SetMusicInfo(MusicInfo),
    #[serde(rename = "setMusicAlbumCoverImageURI")]
    SetMusicAlbumCoverImageUri {
        img_url: String,
    },
    SetMusicAlbumCoverImageData {
        data: Vec<u8>,
    },
    OnPlayProgress {
        progress: u64,
    },
    OnVolumeChanged {
        volume: f64,
    },
    OnPaused,
    OnResumed,
    OnAudioData {
        data: Vec<u8>,
    },
    SetLyric {
        data: Vec<LyricLine>,
    },
    #[serde(rename = "setLyricFromTTML")]
    SetLyricFromTtml {
        data: String,
    },
    Pause,
    Resume,
    ForwardSong,
    BackwardSong,
    SetVolume {
        volume: f64,
    },
    SeekPlayProgress {
        progress: u64,
    },
}

impl Message {
    /// The payload-free message of `kind`, if it has one.
    pub fn bare(kind: MessageKind) -> Option<Message> {
        let message = match kind {
            MessageKind::Ping => Message::Ping,
            MessageKind::Pong => Message::Pong,
            MessageKind::OnPaused => Message::OnPaused,
            MessageKind::OnResumed => Message::OnResumed,
            MessageKind::Pause => Message::Pause,
            MessageKind::Resume => Message::Resume,
            MessageKind::ForwardSong => Message::ForwardSong,
            MessageKind::BackwardSong => Message::BackwardSong,
            _ => return None,
        };
        Some(message)
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Ping => MessageKind::Ping,
            Message::Pong => MessageKind::Pong,
            Message::SetMusicInfo(_) => MessageKind::SetMusicInfo,
            Message::SetMusicAlbumCoverImageUri { .. } => MessageKind::SetMusicAlbumCoverImageUri,
            Message::SetMusicAlbumCoverImageData { .. } => MessageKind::SetMusicAlbumCoverImageData,
            Message::OnPlayProgress { .. } => MessageKind::OnPlayProgress,
            Message::OnVolumeChanged { .. } => MessageKind::OnVolumeChanged,
            Message::OnPaused => MessageKind::OnPaused,
            Message::OnResumed => MessageKind::OnResumed,
            Message::OnAudioData { .. } => MessageKind::OnAudioData,
            Message::SetLyric { .. } => MessageKind::SetLyric,
            Message::SetLyricFromTtml { .. } => MessageKind::SetLyricFromTtml,
            Message::Pause => MessageKind::Pause,
            Message::Resume => MessageKind::Resume,
            Message::ForwardSong => MessageKind::ForwardSong,
            Message::BackwardSong => MessageKind::BackwardSong,
            Message::SetVolume { .. } => MessageKind::SetVolume,
            Message::SeekPlayProgress { .. } => MessageKind::SeekPlayProgress,
        }
    }

    /// Append the opcode and payload to `buf`.
    pub fn encode_to(&self, buf: &mut BytesMut) {
        buf.put_u16_le(self.kind().opcode());
        match self {
            Message::Ping
            | Message::Pong
            | Message::OnPaused
            | Message::OnResumed
            | Message::Pause
            | Message::Resume
            | Message::ForwardSong
            | Message::BackwardSong => {}
            Message::SetMusicInfo(info) => info.encode(buf),
            Message::SetMusicAlbumCoverImageUri { img_url } => img_url.encode(buf),
            Message::SetMusicAlbumCoverImageData { data } | Message::OnAudioData { data } => {
                data.encode(buf)
            }
            Message::OnPlayProgress { progress } | Message::SeekPlayProgress { progress } => {
                progress.encode(buf)
            }
            Message::OnVolumeChanged { volume } | Message::SetVolume { volume } => {
                volume.encode(buf)
            }
            Message::SetLyric { data } => data.encode(buf),
            Message::SetLyricFromTtml { data } => data.encode(buf),
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(64);
        self.encode_to(&mut buf);
        buf.freeze()
    }

    fn decode_payload(kind: MessageKind, reader: &mut Reader<'_>) -> Result<Self> {
        let message = match kind {
            MessageKind::Ping => Message::Ping,
            MessageKind::Pong => Message::Pong,
            MessageKind::SetMusicInfo => Message::SetMusicInfo(MusicInfo::decode(reader)?),
            MessageKind::SetMusicAlbumCoverImageUri => Message::SetMusicAlbumCoverImageUri {
                img_url: String::decode(reader)?,
            },
            MessageKind::SetMusicAlbumCoverImageData => Message::SetMusicAlbumCoverImageData {
                data: reader.read_vec()?,
            },
            MessageKind::OnPlayProgress => Message::OnPlayProgress {
                progress: reader.read_u64()?,
            },
            MessageKind::OnVolumeChanged => Message::OnVolumeChanged {
                volume: reader.read_f64()?,
            },
            MessageKind::OnPaused => Message::OnPaused,
            MessageKind::OnResumed => Message::OnResumed,
            MessageKind::OnAudioData => Message::OnAudioData {
                data: reader.read_vec()?,
            },
            MessageKind::SetLyric => Message::SetLyric {
                data: reader.read_vec()?,
            },
            MessageKind::SetLyricFromTtml => Message::SetLyricFromTtml {
                data: String::decode(reader)?,
            },
            MessageKind::Pause => Message::Pause,
            MessageKind::Resume => Message::Resume,
            MessageKind::ForwardSong => Message::ForwardSong,
            MessageKind::BackwardSong => Message::BackwardSong,
            MessageKind::SetVolume => Message::SetVolume {
                volume: reader.read_f64()?,
            },
            MessageKind::SeekPlayProgress => Message::SeekPlayProgress {
                progress: reader.read_u64()?,
            },
        };
        Ok(message)
    }
}

/// Decoder policy knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Fail with [`DecodeError::TrailingBytes`] instead of ignoring bytes left
    /// after the last payload field.
    pub reject_trailing_bytes: bool,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        DecodeOptions {
            reject_trailing_bytes: true,
        }
    }
}

/// Serialize `message` as `[opcode: u16 LE][payload]`.
pub fn encode(message: &Message) -> Bytes {
    message.encode()
}

/// Decode one message from the start of `bytes`, tolerating trailing bytes.
///
/// Returns the message and the number of bytes consumed.
pub fn decode(bytes: &[u8]) -> Result<(Message, usize)> {
    decode_with(bytes, DecodeOptions::default())
}

pub fn decode_with(bytes: &[u8], options: DecodeOptions) -> Result<(Message, usize)> {
    let mut reader = Reader::new(bytes);
    let opcode = reader.read_u16()?;
    let kind = MessageKind::from_opcode(opcode).ok_or(DecodeError::UnknownOpcode(opcode))?;
    let message = Message::decode_payload(kind, &mut reader)?;

    if options.reject_trailing_bytes && reader.remaining() > 0 {
        return Err(DecodeError::TrailingBytes(reader.remaining()));
    }
    Ok((message, reader.position()))
}
