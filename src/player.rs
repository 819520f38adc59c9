use crate::net::SessionHandler;
use crate::proto::{Artist, Message, MusicInfo};
use async_trait::async_trait;
use log::{debug, info, warn};

/// Duration announced when the host does not know the track length.
pub const DEFAULT_DURATION_MS: u64 = 240_000;

/// Player host state driven by commands from the lyric client.
pub struct Player {
    playlist: Vec<MusicInfo>,
    current: usize,
    paused: bool,
    volume: f64,
    progress: u64,
    cover_url: Option<String>,
    ttml: Option<String>,
}

impl Player {
    pub fn new(playlist: Vec<MusicInfo>) -> Self {
        Self {
            playlist,
            current: 0,
            paused: true,
            volume: 1.0,
            progress: 0,
            cover_url: None,
            ttml: None,
        }
    }

    pub fn with_cover_url(mut self, url: impl Into<String>) -> Self {
        self.cover_url = Some(url.into());
        self
    }

    pub fn with_ttml(mut self, ttml: impl Into<String>) -> Self {
        self.ttml = Some(ttml.into());
        self
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn progress(&self) -> u64 {
        self.progress
    }

    pub fn current_track(&self) -> Option<&MusicInfo> {
        self.playlist.get(self.current)
    }

    /// Track announcement sent when a connection is made or the track changes.
    fn announce(&self) -> Vec<Message> {
        let Some(track) = self.current_track() else {
            return Vec::new();
        };

        let mut messages = vec![Message::SetMusicInfo(track.clone())];
        if let Some(ref url) = self.cover_url {
            messages.push(Message::SetMusicAlbumCoverImageUri {
                img_url: url.clone(),
            });
        }
        if let Some(ref ttml) = self.ttml {
            messages.push(Message::SetLyricFromTtml { data: ttml.clone() });
        }
        messages
    }

    fn skip_to(&mut self, index: usize) -> Vec<Message> {
        if index == self.current || index >= self.playlist.len() {
            return Vec::new();
        }
        self.current = index;
        self.progress = 0;
        vec![Message::SetMusicInfo(self.playlist[index].clone())]
    }

    pub fn on_recv_message(&mut self, message: Message) -> Vec<Message> {
        match message {
            Message::Pause => {
                self.paused = true;
                vec![Message::OnPaused]
            }
            Message::Resume => {
                self.paused = false;
                vec![Message::OnResumed]
            }
            Message::SetVolume { volume } => {
                if !volume.is_finite() {
                    warn!("ignoring volume {}", volume);
                    return Vec::new();
                }
                self.volume = volume.clamp(0.0, 1.0);
                vec![Message::OnVolumeChanged {
                    volume: self.volume,
                }]
            }
            Message::SeekPlayProgress { progress } => {
                self.progress = progress;
                vec![Message::OnPlayProgress { progress }]
            }
            Message::ForwardSong => self.skip_to(self.current.saturating_add(1)),
            Message::BackwardSong => self.skip_to(self.current.saturating_sub(1)),
            Message::Pong => Vec::new(),
            other => {
                debug!("unhandled message: {}", other.kind());
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl SessionHandler for Player {
    async fn on_session_start(&mut self) -> anyhow::Result<Vec<Message>> {
        Ok(self.announce())
    }

    async fn on_message(&mut self, message: Message) -> anyhow::Result<Vec<Message>> {
        Ok(self.on_recv_message(message))
    }

    async fn on_session_close(&mut self) -> anyhow::Result<()> {
        info!("session closed, paused at {} ms", self.progress);
        self.paused = true;
        Ok(())
    }
}

/// Convert a `minutes:seconds` display string into milliseconds.
pub fn parse_time_string(time: &str) -> Option<u64> {
    let (minutes, seconds) = time.trim().split_once(':')?;
    let minutes: u64 = minutes.trim().parse().ok()?;
    let seconds: u64 = seconds.trim().parse().ok()?;
    minutes
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(1000)
}

/// Split a comma separated artist list; each name also serves as its id.
pub fn artists_from_csv(names: &str) -> Vec<Artist> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(Artist::named)
        .collect()
}
