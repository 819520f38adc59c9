use crate::net::session::{run_session, SessionConfig, SessionHandler};
use crate::proto::Message;
use log::{info, warn};
use socket2::{SockRef, TcpKeepalive};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::{client_async_with_config, WebSocketStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    Disconnected,
}

impl Display for ConnectionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "Connected"),
            ConnectionStatus::Connecting => write!(f, "Connecting"),
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub addr: String,
    pub retry_interval: Duration,
    pub session: SessionConfig,
}

/// Keeps a connection to the player host alive, reconnecting after every failure.
pub struct Client {
    config: ClientConfig,
    status: Arc<RwLock<ConnectionStatus>>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            status: Arc::new(RwLock::new(ConnectionStatus::Disconnected)),
        }
    }

    pub async fn get_status(&self) -> ConnectionStatus {
        *self.status.read().await
    }

    /// Connect, run the session, wait `retry_interval`, repeat. Only returns
    /// when the handler fails to shut a session down.
    pub async fn run_forever<H>(
        &self,
        handler: &mut H,
        outbound: &mut UnboundedReceiver<Message>,
    ) -> anyhow::Result<()>
    where
        H: SessionHandler + ?Sized,
    {
        loop {
            *self.status.write().await = ConnectionStatus::Connecting;
            match do_connect(&self.config.addr, self.config.session.websocket_config()).await {
                Ok(stream) => {
                    info!("connected to {}", self.config.addr);
                    *self.status.write().await = ConnectionStatus::Connected;

                    // messages queued while offline describe a stale state
                    while outbound.try_recv().is_ok() {}

                    let result = run_session(stream, handler, outbound, &self.config.session).await;
                    *self.status.write().await = ConnectionStatus::Disconnected;
                    handler.on_session_close().await?;

                    match result {
                        Ok(()) => info!("connection to {} closed", self.config.addr),
                        Err(err) => warn!("connection to {} lost: {}", self.config.addr, err),
                    }
                }
                Err(err) => {
                    *self.status.write().await = ConnectionStatus::Disconnected;
                    warn!("connect to {} failed: {}", self.config.addr, err);
                }
            }

            info!("retrying in {:?}", self.config.retry_interval);
            sleep(self.config.retry_interval).await;
        }
    }
}

/// Open a TCP connection to `addr` and perform the WebSocket handshake on `ws://addr`.
pub async fn do_connect(
    addr: &str,
    config: WebSocketConfig,
) -> anyhow::Result<WebSocketStream<TcpStream>> {
    let stream = TcpStream::connect(addr).await?;

    let ka = TcpKeepalive::new().with_time(Duration::from_secs(30));
    let sf = SockRef::from(&stream);
    sf.set_tcp_keepalive(&ka)?;

    let url = format!("ws://{}", addr);
    let (stream, _response) = client_async_with_config(url, stream, Some(config)).await?;
    Ok(stream)
}
