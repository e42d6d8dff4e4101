use anyhow::{Context, Result};
use clap::Parser;
use futures::{SinkExt, StreamExt};
use glade_relay::protocol::{ClientMessage, ServerMessage};
use glam::DVec3;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "test-client")]
#[command(about = "Test client for the glade pose relay", long_about = None)]
struct Args {
    /// Relay URL
    #[arg(long, default_value = "ws://127.0.0.1:8080")]
    server: String,

    /// Number of pose updates to send
    #[arg(long, default_value = "100")]
    updates: usize,

    /// Update rate in milliseconds
    #[arg(long, default_value = "100")]
    rate_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

type WsStream = futures::stream::SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("test_client={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Glade Test Client v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Connecting to: {}", args.server);

    let (ws, _) = connect_async(args.server.as_str())
        .await
        .context("Failed to connect to relay")?;
    let (mut sink, stream) = ws.split();

    tracing::info!("Connected to relay!");

    // The relay assigns our id on connect; wait for it before moving.
    let (id_tx, id_rx) = tokio::sync::oneshot::channel::<String>();
    tokio::spawn(async move {
        if let Err(e) = receive_snapshots(stream, id_tx).await {
            tracing::error!("Snapshot receiver error: {}", e);
        }
    });

    let id = id_rx
        .await
        .context("Relay closed before assigning a session id")?;
    tracing::info!("Assigned session id: {}", id);

    // Walk in a straight line while slowly turning, like a keyboard-held avatar.
    let mut position = DVec3::new(0.0, 5.0, 0.0);
    let velocity = DVec3::new(0.1, 0.0, 0.05);
    let mut heading = 0.0f64;

    tracing::info!(
        "Sending {} pose updates at {}ms intervals",
        args.updates,
        args.rate_ms
    );

    for i in 0..args.updates {
        position += velocity;
        heading = (heading + 0.01) % std::f64::consts::TAU;

        let update = ClientMessage::PositionUpdate {
            id: id.clone(),
            position,
            rotation: DVec3::new(0.0, heading, 0.0),
        };
        let frame = serde_json::to_string(&update)?;
        sink.send(Message::Text(frame))
            .await
            .context("Failed to send pose update")?;

        if i % 10 == 0 {
            tracing::debug!("Sent update #{}: {:?}", i, position);
        }

        tokio::time::sleep(Duration::from_millis(args.rate_ms)).await;
    }

    tracing::info!("Finished sending {} pose updates", args.updates);

    sink.send(Message::Close(None)).await.ok();

    // Wait a bit to receive final broadcasts.
    tokio::time::sleep(Duration::from_secs(1)).await;

    tracing::info!("Test client finished successfully");
    Ok(())
}

/// Receive snapshot broadcasts from the relay, forwarding the assigned id to
/// the sender loop when it arrives.
async fn receive_snapshots(mut stream: WsStream, id_tx: tokio::sync::oneshot::Sender<String>) -> Result<()> {
    let mut id_tx = Some(id_tx);
    let mut received = 0usize;

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(&text) {
                Ok(ServerMessage::SessionAssigned { id }) => {
                    if let Some(tx) = id_tx.take() {
                        let _ = tx.send(id);
                    }
                }
                Ok(ServerMessage::ClientUpdates { clients }) => {
                    received += 1;
                    if received % 10 == 0 {
                        tracing::info!(
                            "Received snapshot with {} clients (total snapshots: {})",
                            clients.len(),
                            received
                        );
                    }

                    for (id, pose) in &clients {
                        tracing::debug!(
                            "  Client {}: pos=[{:.1}, {:.1}, {:.1}]",
                            id,
                            pose.position.x,
                            pose.position.y,
                            pose.position.z
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to decode frame: {}", e);
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Receive error: {}", e);
                break;
            }
        }
    }

    Ok(())
}
