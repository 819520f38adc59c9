use amll_connector::net::session::DEFAULT_MAX_MESSAGE_SIZE;
use amll_connector::net::{Client, ClientConfig, SessionConfig};
use amll_connector::player::{artists_from_csv, parse_time_string, Player, DEFAULT_DURATION_MS};
use amll_connector::proto::{DecodeOptions, Message, MessageKind, MusicInfo};
use clap::Parser;
use log::{error, info, warn};
use once_cell::sync::Lazy;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Opts {
    /// The player host to connect to, as host:port of its ws:// endpoint
    #[arg(long, default_value = "localhost:11444")]
    pub server: String,

    /// Seconds to wait before reconnecting
    #[arg(long, default_value_t = 5)]
    pub retry_interval_secs: u64,

    /// Largest accepted WebSocket message in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    pub max_message_size: usize,

    /// Reject messages with bytes left after the payload
    #[arg(long)]
    pub strict: bool,

    #[arg(long, default_value = "")]
    pub music_id: String,

    #[arg(long, default_value = "未知音乐")]
    pub music_name: String,

    #[arg(long, default_value = "")]
    pub album_name: String,

    /// Comma separated artist names
    #[arg(long, default_value = "未知歌手")]
    pub artists: String,

    /// Track length as m:ss
    #[arg(long)]
    pub duration: Option<String>,

    #[arg(long)]
    pub cover_url: Option<String>,

    /// File whose contents are sent verbatim as TTML lyrics
    #[arg(long)]
    pub ttml_file: Option<std::path::PathBuf>,
}

pub static GLOBAL_OPTS: Lazy<Opts> = Lazy::new(|| Opts::parse());

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    Lazy::force(&GLOBAL_OPTS);

    let mut player = build_player(&GLOBAL_OPTS)?;

    let client = Client::new(ClientConfig {
        addr: GLOBAL_OPTS.server.clone(),
        retry_interval: Duration::from_secs(GLOBAL_OPTS.retry_interval_secs),
        session: SessionConfig {
            max_message_size: GLOBAL_OPTS.max_message_size,
            decode_options: DecodeOptions {
                reject_trailing_bytes: GLOBAL_OPTS.strict,
            },
        },
    });

    let (tx, mut rx) = unbounded_channel();
    tokio::spawn(forward_commands(BufReader::new(tokio::io::stdin()), tx));

    tokio::select! {
        result = client.run_forever(&mut player, &mut rx) => result?,
        _ = signal::ctrl_c() => info!("shutting down ({})", client.get_status().await),
    }

    Ok(())
}

fn build_player(opts: &Opts) -> anyhow::Result<Player> {
    let duration = opts
        .duration
        .as_deref()
        .map(duration_or_default)
        .unwrap_or(DEFAULT_DURATION_MS);

    let track = MusicInfo {
        music_id: opts.music_id.clone(),
        music_name: opts.music_name.clone(),
        album_id: String::new(),
        album_name: opts.album_name.clone(),
        artists: artists_from_csv(&opts.artists),
        duration,
    };

    let mut player = Player::new(vec![track]);
    if let Some(ref url) = opts.cover_url {
        player = player.with_cover_url(url.as_str());
    }
    if let Some(ref path) = opts.ttml_file {
        player = player.with_ttml(std::fs::read_to_string(path)?);
    }
    Ok(player)
}

fn duration_or_default(text: &str) -> u64 {
    parse_time_string(text).unwrap_or_else(|| {
        warn!(
            "invalid duration {:?}, using {} ms",
            text, DEFAULT_DURATION_MS
        );
        DEFAULT_DURATION_MS
    })
}

/// Runs [`read_commands`] to completion, logging why it stopped.
async fn forward_commands<R>(input: R, tx: UnboundedSender<Message>)
where
    R: AsyncBufRead + Unpin,
{
    if let Err(err) = read_commands(input, tx).await {
        error!("stdin commands stopped: {}", err);
    }
}

/// Each input line names a payload-free message kind (`onPaused`, `forwardSong`, ...)
/// to push to the host.
async fn read_commands<R>(input: R, tx: UnboundedSender<Message>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let kind = match line.parse::<MessageKind>() {
            Ok(kind) => kind,
            Err(err) => {
                warn!("{}", err);
                continue;
            }
        };

        match Message::bare(kind) {
            Some(message) => tx.send(message)?,
            None => warn!("{} needs a payload and cannot be sent from stdin", kind),
        }
    }
    Ok(())
}
