//! WebSocket implementation of the session channel.
//!
//! One [`WsChannel`] owns one connection; the underlying stream is split
//! once at connect time and never shared. The sink half stays with the
//! channel for the replay loop; the stream half moves into a background
//! receive task that watches for the viewer's `stop` command and sets
//! the shared cancellation flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use epistream_types::{ControlAction, ControlPayload, Envelope, MessageKind};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info};

use crate::channel::ReplayChannel;
use crate::error::SessionError;

/// Header carrying the opaque session credential during the handshake.
const KEY_HEADER: &str = "key";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A live WebSocket session to one remote viewer.
pub struct WsChannel {
    key: String,
    stopped: Arc<AtomicBool>,
    outbound: SplitSink<WsStream, Message>,
    receiver: JoinHandle<()>,
}

impl WsChannel {
    /// Connect to a viewer endpoint, attaching the credential as a
    /// `key` request header, and start the background receive task.
    ///
    /// The cancellation flag starts cleared; a fresh connection is
    /// never already stopped.
    ///
    /// # Errors
    ///
    /// [`SessionError::Connect`] when the endpoint is not a valid
    /// WebSocket URL, the credential is not a valid header value, or
    /// the handshake fails. Connect failures are fatal for the session
    /// and are never retried here.
    pub async fn connect(endpoint: &str, key: &str) -> Result<Self, SessionError> {
        let mut request = endpoint
            .into_client_request()
            .map_err(|e| SessionError::Connect(format!("invalid endpoint {endpoint}: {e}")))?;
        let credential = HeaderValue::from_str(key)
            .map_err(|e| SessionError::Connect(format!("invalid credential: {e}")))?;
        request.headers_mut().insert(KEY_HEADER, credential);

        let (stream, _response) = connect_async(request)
            .await
            .map_err(|e| SessionError::Connect(e.to_string()))?;
        info!(endpoint = endpoint, "session connected");

        let (outbound, inbound) = stream.split();
        let stopped = Arc::new(AtomicBool::new(false));
        let receiver = tokio::spawn(receive_loop(inbound, Arc::clone(&stopped)));

        Ok(Self {
            key: key.to_owned(),
            stopped,
            outbound,
            receiver,
        })
    }

    /// Feed one envelope into the sink and explicitly flush it, so the
    /// message is on the wire (or the failure is known) before the next
    /// replay iteration starts.
    async fn send_envelope(&mut self, kind: MessageKind, payload: Value) -> Result<(), SessionError> {
        let envelope = Envelope::new(kind, payload, self.key.clone());
        let text = serde_json::to_string(&envelope)?;
        self.outbound
            .feed(Message::Text(text))
            .await
            .map_err(|e| SessionError::Send(e.to_string()))?;
        self.outbound
            .flush()
            .await
            .map_err(|e| SessionError::Send(e.to_string()))
    }

    /// Close the sink and wait for the receive task to drain.
    async fn shutdown(mut self) -> Result<(), SessionError> {
        self.outbound
            .close()
            .await
            .map_err(|e| SessionError::Send(e.to_string()))?;
        self.receiver
            .await
            .map_err(|e| SessionError::Drain(e.to_string()))?;
        debug!("session closed");
        Ok(())
    }
}

impl ReplayChannel for WsChannel {
    async fn send(&mut self, kind: MessageKind, payload: Value) -> Result<(), SessionError> {
        self.send_envelope(kind, payload).await
    }

    fn is_stopped(&self) -> bool {
        // Single writer (the receive task), single reader (the replay
        // loop); no ordering constraint beyond the flag itself.
        self.stopped.load(Ordering::Relaxed)
    }

    async fn close(mut self) -> Result<(), SessionError> {
        let closedown = serde_json::to_value(ControlPayload::new(ControlAction::Closedown))?;
        self.send_envelope(MessageKind::Control, closedown).await?;
        self.shutdown().await
    }

    async fn disconnect(self) -> Result<(), SessionError> {
        self.shutdown().await
    }
}

/// Drain inbound frames until the connection ends.
///
/// The only frame this core reacts to is the `stop` control command;
/// every other inbound message is ignored as a forward-compatible
/// no-op. Ping/pong and close frames are handled by the protocol layer.
async fn receive_loop(mut inbound: SplitStream<WsStream>, stopped: Arc<AtomicBool>) {
    while let Some(frame) = inbound.next().await {
        match frame {
            Ok(Message::Text(raw)) => {
                if is_stop_command(&raw) {
                    info!("viewer requested stop");
                    stopped.store(true, Ordering::Relaxed);
                } else {
                    debug!("ignoring inbound message");
                }
            }
            Ok(Message::Close(_)) => {
                debug!("viewer closed the connection");
            }
            Ok(_) => {
                // Binary, ping, pong: nothing for this core to do.
            }
            Err(e) => {
                debug!(error = %e, "receive stream ended");
                break;
            }
        }
    }
}

/// Whether an inbound text frame is the viewer's stop command:
/// `{type:"control", data:{type:"simulation", action:"stop"}}`.
///
/// Parsing is deliberately lenient; anything that does not match is
/// simply not a stop command, never an error.
fn is_stop_command(raw: &str) -> bool {
    serde_json::from_str::<Value>(raw).is_ok_and(|message| {
        message.get("type").and_then(Value::as_str) == Some("control")
            && message.get("data").is_some_and(|data| {
                data.get("type").and_then(Value::as_str) == Some("simulation")
                    && data.get("action").and_then(Value::as_str) == Some("stop")
            })
    })
}
