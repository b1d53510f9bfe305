use crate::error::SessionError;
use crate::transport::{ChannelEvent, SignalSink};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use trellis_core::SignalMessage;

/// One WebSocket connection to the signaling relay. A dropped channel ends
/// the session; there is no automatic reconnect.
pub struct SignalChannel {
    out_tx: mpsc::UnboundedSender<SignalMessage>,
}

impl SignalChannel {
    /// Open the relay connection and return the send handle plus the inbound
    /// event stream. `ChannelEvent::Open` is always the first event.
    pub async fn connect(
        url: &str,
    ) -> Result<(Self, mpsc::Receiver<ChannelEvent>), SessionError> {
        let (ws, _) = connect_async(url)
            .await
            .map_err(|e| SessionError::Connection(e.to_string()))?;
        info!("signal channel connected to {}", url);

        let (mut write, mut read) = ws.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<SignalMessage>();
        let (event_tx, event_rx) = mpsc::channel::<ChannelEvent>(256);

        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let text = match serde_json::to_string(&msg) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("failed to serialize envelope: {}", e);
                        continue;
                    }
                };
                if write.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        });

        let reader_tx = event_tx.clone();
        tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => match serde_json::from_str::<SignalMessage>(&text) {
                        Ok(signal) => {
                            if reader_tx.send(ChannelEvent::Signal(signal)).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("invalid envelope from relay: {} ({})", e, text),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("signal channel error: {}", e);
                        break;
                    }
                }
            }
            debug!("signal channel reader finished");
            let _ = reader_tx.send(ChannelEvent::Closed).await;
        });

        let _ = event_tx.send(ChannelEvent::Open).await;

        Ok((Self { out_tx }, event_rx))
    }
}

impl SignalSink for SignalChannel {
    fn send(&self, msg: SignalMessage) {
        if self.out_tx.send(msg).is_err() {
            warn!("signal channel closed; dropping outbound envelope");
        }
    }
}
