use crate::proto::{decode_with, DecodeOptions, Message};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, warn};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::select;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::WebSocketStream;

/// Largest WebSocket message accepted from the peer unless configured otherwise.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024 * 1024 * 2;

/// Application side of a connection.
///
/// Messages returned from the callbacks are written back to the peer in order.
#[async_trait]
pub trait SessionHandler: Send {
    /// Called once the connection is up, before any message is read.
    async fn on_session_start(&mut self) -> anyhow::Result<Vec<Message>>;

    /// Called for every decoded message except `Ping`, which the session answers itself.
    async fn on_message(&mut self, message: Message) -> anyhow::Result<Vec<Message>>;

    async fn on_session_close(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub max_message_size: usize,
    pub decode_options: DecodeOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            decode_options: DecodeOptions::default(),
        }
    }
}

impl SessionConfig {
    /// Limits applied by the WebSocket layer while reading.
    pub fn websocket_config(&self) -> WebSocketConfig {
        let mut config = WebSocketConfig::default();
        config.max_message_size = Some(self.max_message_size);
        config.max_frame_size = Some(self.max_message_size);
        config
    }
}

/// Drive one WebSocket connection until the peer closes it.
///
/// Every binary message carries exactly one encoded protocol message. Messages
/// that fail to decode are logged and dropped; the connection stays up.
pub async fn run_session<S, H>(
    stream: WebSocketStream<S>,
    handler: &mut H,
    outbound: &mut UnboundedReceiver<Message>,
    config: &SessionConfig,
) -> anyhow::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
    H: SessionHandler + ?Sized,
{
    let (mut writer, mut reader) = stream.split();

    for message in handler.on_session_start().await? {
        send_message(&mut writer, &message).await?;
    }

    loop {
        select! {
            incoming = reader.next() => {
                let data = match incoming {
                    None => return Ok(()),
                    Some(frame) => match frame? {
                        WsMessage::Binary(data) => data,
                        WsMessage::Close(_) => return Ok(()),
                        WsMessage::Text(text) => {
                            warn!("ignoring text message: {} bytes", text.len());
                            continue;
                        }
                        // control frames are answered by the websocket layer
                        _ => continue,
                    },
                };

                for reply in on_recv_frame(handler, &data, config).await? {
                    send_message(&mut writer, &reply).await?;
                }
            }
            Some(message) = outbound.recv() => {
                send_message(&mut writer, &message).await?;
            }
        }
    }
}

async fn on_recv_frame<H>(
    handler: &mut H,
    frame: &[u8],
    config: &SessionConfig,
) -> anyhow::Result<Vec<Message>>
where
    H: SessionHandler + ?Sized,
{
    let message = match decode_with(frame, config.decode_options) {
        Ok((message, _)) => message,
        Err(err) => {
            error!("decode failed: {}, raw: {}", err, hex_dump(frame));
            return Ok(Vec::new());
        }
    };
    debug!("recv: {}", serde_json::to_string(&message)?);

    match message {
        Message::Ping => Ok(vec![Message::Pong]),
        message => handler.on_message(message).await,
    }
}

/// Send `message` as one binary WebSocket message.
pub async fn send_message<W>(writer: &mut W, message: &Message) -> anyhow::Result<()>
where
    W: futures_util::Sink<WsMessage, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    debug!("send: {}", serde_json::to_string(message)?);
    writer.send(WsMessage::Binary(message.encode().to_vec())).await?;
    Ok(())
}

/// Space separated hex dump, for logging messages that failed to decode.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
