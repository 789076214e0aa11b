//! Cloneable façade for issuing commands to the session worker.
//!
//! [`SessionHandle`] hides channel plumbing and offers async helpers for every
//! session operation. Players, the network replay layer and clients all talk
//! to the session through it; none of them touch the world directly.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{
    CellCoord, Command, CommandKind, ExecuteOutcome, Origin, PlayerNumber, UnitId, UnitMark,
    UnitStats,
};

use super::errors::{Result, RuntimeError, SessionError};
use crate::events::{Event, EventBus, Topic};
use crate::session::SessionSnapshot;
use crate::workers::SessionCommand;

/// Client-facing handle to interact with one session.
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
    event_bus: EventBus,
}

impl SessionHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<SessionCommand>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(make(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    async fn session_request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<std::result::Result<T, SessionError>>) -> SessionCommand,
    ) -> Result<T> {
        Ok(self.request(make).await??)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Validates the world and initializes every player.
    pub async fn initialize_game(&self) -> Result<()> {
        self.session_request(|reply| SessionCommand::InitializeGame { reply })
            .await
    }

    /// Resolves the opening turn and hands control to its player.
    pub async fn start_game(&self, origin: Origin) -> Result<()> {
        self.session_request(|reply| SessionCommand::StartGame { origin, reply })
            .await
    }

    /// Ends the current player's turn.
    pub async fn end_turn(&self, origin: Origin) -> Result<()> {
        self.session_request(|reply| SessionCommand::EndTurn {
            player: None,
            turn: None,
            origin,
            reply,
        })
        .await
    }

    /// Ends the turn only if `player` is still the current player.
    ///
    /// Automated players and replayed turn ends use this so a late request
    /// can never end somebody else's turn.
    pub async fn end_turn_for(&self, player: PlayerNumber, origin: Origin) -> Result<()> {
        self.session_request(|reply| SessionCommand::EndTurn {
            player: Some(player),
            turn: None,
            origin,
            reply,
        })
        .await
    }

    /// Ends turn number `turn` of `player`, provided the session is still in
    /// it. Replayed turn ends use this so a late or duplicated message is
    /// rejected instead of ending a later turn of the same seat.
    pub async fn end_turn_at(
        &self,
        player: PlayerNumber,
        turn: u32,
        origin: Origin,
    ) -> Result<()> {
        self.session_request(|reply| SessionCommand::EndTurn {
            player: Some(player),
            turn: Some(turn),
            origin,
            reply,
        })
        .await
    }

    /// Executes an ability for the current player.
    pub async fn execute_command(&self, command: Command) -> Result<ExecuteOutcome> {
        self.session_request(|reply| SessionCommand::Execute { command, reply })
            .await
    }

    // ========================================================================
    // Human input routing
    // ========================================================================

    pub async fn select_unit(&self, unit: UnitId) -> Result<()> {
        self.session_request(|reply| SessionCommand::SelectUnit { unit, reply })
            .await
    }

    pub async fn deselect_unit(&self) -> Result<()> {
        self.session_request(|reply| SessionCommand::DeselectUnit { reply })
            .await
    }

    /// Executes `kind` on behalf of the local human whose turn it is.
    pub async fn submit_human_command(&self, kind: CommandKind) -> Result<ExecuteOutcome> {
        self.session_request(|reply| SessionCommand::SubmitHuman { kind, reply })
            .await
    }

    // ========================================================================
    // Unit hooks and membership
    // ========================================================================

    /// Sets a unit's presentation mark and publishes the matching unit event.
    pub async fn mark_unit(&self, unit: UnitId, mark: UnitMark) -> Result<()> {
        self.session_request(|reply| SessionCommand::MarkUnit { unit, mark, reply })
            .await
    }

    pub async fn add_unit(
        &self,
        owner: PlayerNumber,
        cell: Option<CellCoord>,
        stats: UnitStats,
    ) -> Result<UnitId> {
        self.session_request(|reply| SessionCommand::AddUnit {
            owner,
            cell,
            stats,
            reply,
        })
        .await
    }

    /// Reports that the peer controlling `player` has left.
    pub async fn peer_disconnected(&self, player: PlayerNumber) -> Result<()> {
        self.session_request(|reply| SessionCommand::PeerDisconnected { player, reply })
            .await
    }

    // ========================================================================
    // Queries and events
    // ========================================================================

    /// Read-only copy of the session.
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.request(|reply| SessionCommand::Snapshot { reply })
            .await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Lifecycle` - Game and turn lifecycle
    /// - `Topic::Unit` - Unit membership, selection and combat
    /// - `Topic::Ability` - Every executed command
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Asks the worker to cancel any automated turn and stop.
    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.request(|reply| SessionCommand::Shutdown { reply }).await
    }
}
