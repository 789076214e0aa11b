//! Peer links.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use game_core::{PlayerNumber, WireError, WirePayload};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::trace;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,

    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Link from one instance to its peers.
///
/// An instance is identified by the seat it hosts locally. Exactly one
/// instance in a session is the host; it ends turns on behalf of departed
/// peers.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Delivers `payload` to every other connected instance.
    async fn send(&self, payload: &WirePayload) -> Result<(), TransportError>;

    /// Waits for the next payload. `None` once the link is closed.
    async fn receive(&self) -> Option<Result<WirePayload, TransportError>>;

    fn is_host(&self) -> bool;

    fn is_peer_connected(&self, player: PlayerNumber) -> bool;
}

#[derive(Default)]
struct Hub {
    host: Option<PlayerNumber>,
    peers: BTreeMap<PlayerNumber, mpsc::UnboundedSender<Vec<u8>>>,
}

/// In-memory transport linking instances inside one process.
///
/// Payloads are framed to bytes exactly as a socket transport would frame
/// them, so codec errors surface the same way.
pub struct LocalTransport {
    player: PlayerNumber,
    hub: Arc<Mutex<Hub>>,
    inbox: tokio::sync::Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl LocalTransport {
    /// Two linked endpoints for players 0 and 1. Player 0 hosts.
    pub fn pair() -> (Self, Self) {
        let hub = Self::hub();
        (
            Self::join(&hub, PlayerNumber(0)),
            Self::join(&hub, PlayerNumber(1)),
        )
    }

    /// Fully connected endpoints for players `0..count`. Player 0 hosts.
    pub fn mesh(count: u8) -> Vec<Self> {
        let hub = Self::hub();
        (0..count)
            .map(|n| Self::join(&hub, PlayerNumber(n)))
            .collect()
    }

    fn hub() -> Arc<Mutex<Hub>> {
        Arc::new(Mutex::new(Hub {
            host: Some(PlayerNumber(0)),
            peers: BTreeMap::new(),
        }))
    }

    fn join(hub: &Arc<Mutex<Hub>>, player: PlayerNumber) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        hub.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .peers
            .insert(player, tx);
        Self {
            player,
            hub: Arc::clone(hub),
            inbox: tokio::sync::Mutex::new(rx),
        }
    }

    pub fn player(&self) -> PlayerNumber {
        self.player
    }

    /// Leaves the mesh. Peers see this endpoint as disconnected and its
    /// `receive` returns `None` once buffered payloads are read.
    pub fn disconnect(&self) {
        let removed = self
            .hub
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .peers
            .remove(&self.player);
        if removed.is_some() {
            trace!(target: "runtime::replay", player = %self.player, "local transport disconnected");
        }
    }

    /// Pushes raw bytes to `to`, bypassing the codec.
    pub fn send_raw(&self, to: PlayerNumber, bytes: Vec<u8>) -> Result<(), TransportError> {
        let hub = self.hub.lock().unwrap_or_else(PoisonError::into_inner);
        let peer = hub.peers.get(&to).ok_or(TransportError::Closed)?;
        peer.send(bytes).map_err(|_| TransportError::Closed)
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn send(&self, payload: &WirePayload) -> Result<(), TransportError> {
        let bytes = payload.to_bytes()?;
        let hub = self.hub.lock().unwrap_or_else(PoisonError::into_inner);
        if !hub.peers.contains_key(&self.player) {
            return Err(TransportError::Closed);
        }
        for (player, peer) in &hub.peers {
            if *player == self.player {
                continue;
            }
            // A peer that dropped its endpoint without disconnecting simply
            // misses the payload.
            if peer.send(bytes.clone()).is_err() {
                trace!(target: "runtime::replay", to = %player, "peer inbox closed");
            }
        }
        Ok(())
    }

    async fn receive(&self) -> Option<Result<WirePayload, TransportError>> {
        let bytes = self.inbox.lock().await.recv().await?;
        Some(WirePayload::from_bytes(&bytes).map_err(TransportError::from))
    }

    fn is_host(&self) -> bool {
        self.hub.lock().unwrap_or_else(PoisonError::into_inner).host == Some(self.player)
    }

    fn is_peer_connected(&self, player: PlayerNumber) -> bool {
        self.hub
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .peers
            .contains_key(&player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::OpCode;

    #[tokio::test]
    async fn pair_delivers_to_the_other_side_only() {
        let (host, guest) = LocalTransport::pair();
        assert!(host.is_host());
        assert!(!guest.is_host());

        let payload = WirePayload::new(OpCode::TurnEnded)
            .with_field("player_number", 0)
            .with_field("turn", 1);
        host.send(&payload).await.unwrap();

        let received = guest.receive().await.unwrap().unwrap();
        assert_eq!(received, payload);
    }

    #[tokio::test]
    async fn disconnect_is_visible_to_peers() {
        let (host, guest) = LocalTransport::pair();
        assert!(host.is_peer_connected(PlayerNumber(1)));

        guest.disconnect();
        assert!(!host.is_peer_connected(PlayerNumber(1)));
        assert!(matches!(
            guest.send(&WirePayload::new(OpCode::TurnEnded)).await,
            Err(TransportError::Closed)
        ));
    }

    #[tokio::test]
    async fn garbage_bytes_surface_as_codec_errors() {
        let (host, guest) = LocalTransport::pair();
        host.send_raw(PlayerNumber(1), vec![0xff, 0x00, 0x13]).unwrap();

        assert!(matches!(
            guest.receive().await,
            Some(Err(TransportError::Wire(_)))
        ));
    }
}
