use super::session::{ClientSession, SessionState};
use super::{RelayError, Result};
use crate::config::RelayConfig;
use crate::protocol::{ClientMessage, Pose};
use crate::relay::{PeerSender, Relay};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// WebSocket front end for the relay.
///
/// Accepts connections on the configured address and drives one reader and
/// one writer task per client. All registry access goes through the shared
/// [`Relay`].
pub struct WebSocketServer {
    config: RelayConfig,
    relay: Arc<Relay>,
}

impl WebSocketServer {
    pub fn new(config: RelayConfig, relay: Arc<Relay>) -> Self {
        Self { config, relay }
    }

    /// Bind and serve until the process exits.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.bind_address).await?;
        tracing::info!("Relay listening on {}", self.config.bind_address);

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    let relay = self.relay.clone();
                    tokio::spawn(async move {
                        if let Err(err) = handle_connection(relay, stream, addr).await {
                            tracing::warn!("Connection handler error for {}: {}", addr, err);
                        }
                    });
                }
                Err(err) => {
                    tracing::warn!("TCP accept failed: {}", err);
                }
            }
        }
    }
}

/// Drive a single client connection from handshake to teardown.
async fn handle_connection(relay: Arc<Relay>, stream: TcpStream, addr: SocketAddr) -> Result<()> {
    tracing::debug!("{} from {}: websocket handshake", SessionState::Connecting, addr);

    let ws = tokio_tungstenite::accept_async(stream)
        .await
        .map_err(|err| RelayError::Transport(format!("websocket handshake failed: {err}")))?;
    let (mut ws_sink, mut ws_stream) = ws.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let session = relay.connect(PeerSender::new(tx));
    tracing::debug!("{}: session {} from {}", SessionState::Connected, session.id, addr);

    // Writer task: drains the outbound queue onto the socket. A send failure
    // only ends this peer's writer; the reader observes the closed socket and
    // runs the disconnect path.
    let writer_id = session.id.clone();
    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(err) = ws_sink.send(Message::Text(frame)).await {
                tracing::warn!("Send to client {} failed, stopping writer: {}", writer_id, err);
                break;
            }
        }
    });

    while let Some(frame) = ws_stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if let Err(err) = dispatch(&relay, &session, &text) {
                    tracing::warn!("Dropping frame from {}: {}", session.id, err);
                }
            }
            Ok(Message::Close(_)) => break,
            // Pings are answered by tungstenite itself.
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            // Binary frames are not part of the protocol.
            Ok(_) => {}
            Err(err) => {
                tracing::debug!("Read error on session {}, closing: {}", session.id, err);
                break;
            }
        }
    }

    relay.disconnect(&session.id);
    writer.abort();
    tracing::debug!(
        "{}: session {} after {:?}",
        SessionState::Disconnected,
        session.id,
        session.connected_at.elapsed()
    );
    Ok(())
}

/// Decode and apply one inbound text frame.
///
/// Malformed frames and rejected updates surface as errors the caller logs
/// and drops; nothing here can take down the connection or the process.
fn dispatch(relay: &Relay, session: &ClientSession, text: &str) -> Result<()> {
    let message: ClientMessage = serde_json::from_str(text)?;

    match message {
        ClientMessage::PositionUpdate { id, position, rotation } => {
            relay.handle_pose_update(&session.id, &id, Pose::new(position, rotation))?;
        }
    }

    Ok(())
}
