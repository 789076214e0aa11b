//! High-level runtime orchestrator.
//!
//! The runtime owns the session worker and, for networked sessions, the
//! replay tasks. It wires up command/event channels and exposes a
//! builder-based API for clients to assemble one session instance.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{Notify, broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use game_core::{
    CommandRegistry, DominationCondition, GameEndCondition, PlayerNumber, SubsequentTurnResolver,
    TurnResolver, World,
};

use crate::ai::{SelectionStrategy, UnitTree, presets};
use crate::api::{Result, RuntimeError, SessionHandle};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, Topic};
use crate::network::{self, CommandReplay, ReplayMetrics, Transport};
use crate::players::{AutomatedPlayer, Player};
use crate::workers::{SessionWorker, SessionWorkerParts};

/// One running session instance.
///
/// [`SessionHandle`] provides the cloneable façade for clients; the runtime
/// itself only owns the background tasks.
pub struct Runtime {
    handle: SessionHandle,
    replay: Option<CommandReplay>,
    debug_gate: Arc<Notify>,

    // Background tasks
    worker: JoinHandle<()>,
    network_tasks: Vec<JoinHandle<()>>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this session.
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// The replay layer, present when a transport was configured.
    pub fn replay(&self) -> Option<&CommandReplay> {
        self.replay.as_ref()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Releases an automated player waiting for a debug step.
    pub fn debug_step(&self) {
        self.debug_gate.notify_one();
    }

    /// Stops the session worker and the network tasks.
    ///
    /// Any automated turn in flight is cancelled first.
    pub async fn shutdown(self) -> Result<()> {
        match self.handle.shutdown().await {
            Ok(()) | Err(RuntimeError::CommandChannelClosed) => {}
            Err(error) => return Err(error),
        }
        for task in &self.network_tasks {
            task.abort();
        }
        self.worker.await.map_err(RuntimeError::WorkerJoin)?;
        debug!(target: "runtime::session", "runtime shut down");
        Ok(())
    }
}

enum Seat {
    Human,
    Automated {
        tree: Option<UnitTree>,
        strategy: SelectionStrategy,
    },
    Remote,
}

/// Builder for [`Runtime`].
///
/// Every player in the world needs exactly one seat. Remote seats need a
/// transport.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    world: Option<World>,
    resolver: Option<Box<dyn TurnResolver>>,
    end_conditions: Vec<Box<dyn GameEndCondition>>,
    seats: Vec<(PlayerNumber, Seat)>,
    transport: Option<Arc<dyn Transport>>,
    registry: Option<CommandRegistry>,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            world: None,
            resolver: None,
            end_conditions: Vec::new(),
            seats: Vec::new(),
            transport: None,
            registry: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn world(mut self, world: World) -> Self {
        self.world = Some(world);
        self
    }

    /// Overrides the default [`SubsequentTurnResolver`].
    pub fn resolver(mut self, resolver: impl TurnResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Adds an end condition. Without any, [`DominationCondition`] is used.
    pub fn end_condition(mut self, condition: impl GameEndCondition + 'static) -> Self {
        self.end_conditions.push(Box::new(condition));
        self
    }

    /// Seats a human at this instance.
    pub fn human(mut self, player: PlayerNumber) -> Self {
        self.seats.push((player, Seat::Human));
        self
    }

    /// Seats the AI with the default skirmisher tree.
    pub fn automated(mut self, player: PlayerNumber, strategy: SelectionStrategy) -> Self {
        self.seats.push((
            player,
            Seat::Automated {
                tree: None,
                strategy,
            },
        ));
        self
    }

    /// Seats the AI with a custom unit tree.
    pub fn automated_with(
        mut self,
        player: PlayerNumber,
        tree: UnitTree,
        strategy: SelectionStrategy,
    ) -> Self {
        self.seats.push((
            player,
            Seat::Automated {
                tree: Some(tree),
                strategy,
            },
        ));
        self
    }

    /// Marks a seat as played by a peer.
    pub fn remote(mut self, player: PlayerNumber) -> Self {
        self.seats.push((player, Seat::Remote));
        self
    }

    pub fn transport(mut self, transport: impl Transport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Overrides the default command decoders.
    pub fn registry(mut self, registry: CommandRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the runtime and spawn its tasks.
    pub async fn build(self) -> Result<Runtime> {
        let world = self.world.ok_or(RuntimeError::MissingWorld)?;
        let debug_gate = Arc::new(Notify::new());

        let mut players = BTreeMap::new();
        for (number, seat) in self.seats {
            if world.player(number).is_none() {
                return Err(RuntimeError::UnknownPlayer(number));
            }
            if seat_is_remote(&seat) && self.transport.is_none() {
                return Err(RuntimeError::MissingTransport);
            }
            let player = match seat {
                Seat::Human => Player::Human,
                Seat::Remote => Player::Remote,
                Seat::Automated { tree, strategy } => {
                    let tree =
                        tree.unwrap_or_else(|| presets::skirmisher(self.config.automated.move_delay));
                    Player::Automated(Arc::new(
                        AutomatedPlayer::new(tree, strategy, self.config.automated.clone())
                            .with_debug_gate(Arc::clone(&debug_gate)),
                    ))
                }
            };
            if players.insert(number, player).is_some() {
                return Err(RuntimeError::DuplicatePlayer(number));
            }
        }
        if let Some(unassigned) = world
            .players()
            .iter()
            .map(|spec| spec.number)
            .find(|number| !players.contains_key(number))
        {
            return Err(RuntimeError::UnassignedPlayer(unassigned));
        }

        let resolver = self
            .resolver
            .unwrap_or_else(|| Box::new(SubsequentTurnResolver));
        let mut end_conditions = self.end_conditions;
        if end_conditions.is_empty() {
            end_conditions.push(Box::new(DominationCondition));
        }

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let handle = SessionHandle::new(command_tx.clone(), event_bus.clone());

        // Replay layer
        let mut network_tasks = Vec::new();
        let mut replay = None;
        let mut outbound = None;
        if let Some(transport) = &self.transport {
            let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
            let metrics = Arc::new(ReplayMetrics::new());
            let registry = Arc::new(self.registry.unwrap_or_else(CommandRegistry::with_defaults));
            let command_replay = CommandReplay::new(handle.clone(), registry, Arc::clone(&metrics));

            network_tasks.push(network::spawn_outbound(
                Arc::clone(transport),
                outbound_rx,
                metrics,
            ));
            network_tasks.push(network::spawn_inbound(
                Arc::clone(transport),
                command_replay.clone(),
            ));
            outbound = Some(outbound_tx);
            replay = Some(command_replay);
        }

        info!(
            target: "runtime::session",
            players = players.len(),
            networked = self.transport.is_some(),
            "runtime built"
        );

        let worker = SessionWorker::new(
            SessionWorkerParts {
                world,
                players,
                resolver,
                end_conditions,
                transport: self.transport,
                outbound,
            },
            command_rx,
            command_tx.downgrade(),
            event_bus,
        );
        let worker = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            replay,
            debug_gate,
            worker,
            network_tasks,
        })
    }
}

fn seat_is_remote(seat: &Seat) -> bool {
    matches!(seat, Seat::Remote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::Topology;

    fn duel_world() -> World {
        World::with_players(Topology::Square, 2).unwrap()
    }

    #[tokio::test]
    async fn rejects_incomplete_seating() {
        let missing_world = Runtime::builder().human(PlayerNumber(0)).build().await;
        assert!(matches!(missing_world, Err(RuntimeError::MissingWorld)));

        let unassigned = Runtime::builder()
            .world(duel_world())
            .human(PlayerNumber(0))
            .build()
            .await;
        assert!(matches!(
            unassigned,
            Err(RuntimeError::UnassignedPlayer(PlayerNumber(1)))
        ));

        let duplicate = Runtime::builder()
            .world(duel_world())
            .human(PlayerNumber(0))
            .human(PlayerNumber(0))
            .build()
            .await;
        assert!(matches!(
            duplicate,
            Err(RuntimeError::DuplicatePlayer(PlayerNumber(0)))
        ));

        let unknown = Runtime::builder()
            .world(duel_world())
            .human(PlayerNumber(4))
            .build()
            .await;
        assert!(matches!(
            unknown,
            Err(RuntimeError::UnknownPlayer(PlayerNumber(4)))
        ));

        let no_transport = Runtime::builder()
            .world(duel_world())
            .human(PlayerNumber(0))
            .remote(PlayerNumber(1))
            .build()
            .await;
        assert!(matches!(no_transport, Err(RuntimeError::MissingTransport)));
    }

    #[tokio::test]
    async fn shutdown_stops_the_worker() {
        let runtime = Runtime::builder()
            .world(duel_world())
            .human(PlayerNumber(0))
            .human(PlayerNumber(1))
            .build()
            .await
            .unwrap();
        let handle = runtime.handle();

        runtime.shutdown().await.unwrap();
        assert!(matches!(
            handle.snapshot().await,
            Err(RuntimeError::CommandChannelClosed)
        ));
    }
}
