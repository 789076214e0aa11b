//! Session worker that owns the authoritative [`World`].
//!
//! Receives commands from [`SessionHandle`], applies them through
//! [`GameEngine`], publishes events to the [`EventBus`] and mirrors locally
//! authored actions to the network layer.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::ControlFlow;
use std::sync::Arc;

use behavior_tree::CancelToken;
use game_core::{
    CellCoord, Command, CommandKind, ExecuteOutcome, GameEndCondition, GameEngine, GameResult,
    Origin, PlayerNumber, TurnContext, TurnResolver, TurnTransition, UnitId, UnitMark, UnitStats,
    WireMessage, World, WorldChange,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::api::{SessionError, SessionHandle};
use crate::events::{AbilityEvent, EventBus, SessionEvent, UnitEvent};
use crate::network::Transport;
use crate::players::{PlayOutcome, Player, PlayerKind, TurnStart};
use crate::session::{InteractionState, SessionPhase, SessionSnapshot};

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

/// Commands that can be sent to the session worker.
pub enum SessionCommand {
    InitializeGame {
        reply: Reply<()>,
    },
    StartGame {
        origin: Origin,
        reply: Reply<()>,
    },
    /// Ends the current turn; with `player` set, only if that player is
    /// still current, and with `turn` set, only if it is still that turn.
    EndTurn {
        player: Option<PlayerNumber>,
        turn: Option<u32>,
        origin: Origin,
        reply: Reply<()>,
    },
    Execute {
        command: Command,
        reply: Reply<ExecuteOutcome>,
    },
    SelectUnit {
        unit: UnitId,
        reply: Reply<()>,
    },
    DeselectUnit {
        reply: Reply<()>,
    },
    SubmitHuman {
        kind: CommandKind,
        reply: Reply<ExecuteOutcome>,
    },
    MarkUnit {
        unit: UnitId,
        mark: UnitMark,
        reply: Reply<()>,
    },
    AddUnit {
        owner: PlayerNumber,
        cell: Option<CellCoord>,
        stats: UnitStats,
        reply: Reply<UnitId>,
    },
    PeerDisconnected {
        player: PlayerNumber,
        reply: Reply<()>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

impl SessionCommand {
    fn name(&self) -> &'static str {
        match self {
            SessionCommand::InitializeGame { .. } => "initialize_game",
            SessionCommand::StartGame { .. } => "start_game",
            SessionCommand::EndTurn { .. } => "end_turn",
            SessionCommand::Execute { .. } => "execute_command",
            SessionCommand::SelectUnit { .. } => "select_unit",
            SessionCommand::DeselectUnit { .. } => "deselect_unit",
            SessionCommand::SubmitHuman { .. } => "submit_human_command",
            SessionCommand::MarkUnit { .. } => "mark_unit",
            SessionCommand::AddUnit { .. } => "add_unit",
            SessionCommand::PeerDisconnected { .. } => "peer_disconnected",
            SessionCommand::Snapshot { .. } => "snapshot",
            SessionCommand::Shutdown { .. } => "shutdown",
        }
    }
}

/// Everything the worker is built from, assembled by the runtime builder.
pub(crate) struct SessionWorkerParts {
    pub world: World,
    pub players: BTreeMap<PlayerNumber, Player>,
    pub resolver: Box<dyn TurnResolver>,
    pub end_conditions: Vec<Box<dyn GameEndCondition>>,
    pub transport: Option<Arc<dyn Transport>>,
    pub outbound: Option<mpsc::UnboundedSender<WireMessage>>,
}

/// Background task that owns one session.
///
/// Every operation runs to completion before the next command is read, so
/// the turn loop (play, end turn, transition, play) is a sequence of
/// messages rather than a recursion.
pub(crate) struct SessionWorker {
    world: World,
    phase: SessionPhase,
    turn: Option<TurnContext>,
    interaction: InteractionState,
    result: Option<GameResult>,
    players: BTreeMap<PlayerNumber, Player>,
    resolver: Box<dyn TurnResolver>,
    end_conditions: Vec<Box<dyn GameEndCondition>>,
    command_rx: mpsc::Receiver<SessionCommand>,
    // Weak so the channel closes once every external handle is gone.
    self_tx: mpsc::WeakSender<SessionCommand>,
    event_bus: EventBus,
    transport: Option<Arc<dyn Transport>>,
    outbound: Option<mpsc::UnboundedSender<WireMessage>>,
    departed: BTreeSet<PlayerNumber>,
    active_turn: Option<CancelToken>,
}

impl SessionWorker {
    pub(crate) fn new(
        parts: SessionWorkerParts,
        command_rx: mpsc::Receiver<SessionCommand>,
        self_tx: mpsc::WeakSender<SessionCommand>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            target: "runtime::session",
            players = parts.players.len(),
            units = parts.world.units().count(),
            networked = parts.transport.is_some(),
            "session worker created"
        );

        Self {
            world: parts.world,
            phase: SessionPhase::Uninitialized,
            turn: None,
            interaction: InteractionState::BlockInput,
            result: None,
            players: parts.players,
            resolver: parts.resolver,
            end_conditions: parts.end_conditions,
            command_rx,
            self_tx,
            event_bus,
            transport: parts.transport,
            outbound: parts.outbound,
            departed: BTreeSet::new(),
            active_turn: None,
        }
    }

    /// Main worker loop.
    pub(crate) async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            if self.handle_command(command).is_break() {
                break;
            }
        }
        self.cancel_active_turn();
        debug!(target: "runtime::session", "session worker stopped");
    }

    fn handle_command(&mut self, command: SessionCommand) -> ControlFlow<()> {
        let name = command.name();
        match command {
            SessionCommand::InitializeGame { reply } => {
                let result = self.initialize_game();
                respond(name, reply, result);
            }
            SessionCommand::StartGame { origin, reply } => {
                let result = self.start_game(origin);
                respond(name, reply, result);
            }
            SessionCommand::EndTurn {
                player,
                turn,
                origin,
                reply,
            } => {
                let result = self
                    .end_turn(player, turn, origin)
                    .and_then(|()| self.play_current());
                respond(name, reply, result);
            }
            SessionCommand::Execute { command, reply } => {
                let result = self.execute(command);
                respond(name, reply, result);
            }
            SessionCommand::SelectUnit { unit, reply } => {
                let result = self.select_unit(unit);
                respond(name, reply, result);
            }
            SessionCommand::DeselectUnit { reply } => {
                let result = self.deselect_unit();
                respond(name, reply, result);
            }
            SessionCommand::SubmitHuman { kind, reply } => {
                let result = self.submit_human(kind);
                respond(name, reply, result);
            }
            SessionCommand::MarkUnit { unit, mark, reply } => {
                let result = self.mark_unit(unit, mark);
                respond(name, reply, result);
            }
            SessionCommand::AddUnit {
                owner,
                cell,
                stats,
                reply,
            } => {
                let result = self.add_unit(owner, cell, stats);
                respond(name, reply, result);
            }
            SessionCommand::PeerDisconnected { player, reply } => {
                let result = self.peer_disconnected(player);
                respond(name, reply, result);
            }
            SessionCommand::Snapshot { reply } => {
                if reply.send(self.snapshot()).is_err() {
                    debug!(target: "runtime::session", "snapshot reply channel closed (caller dropped)");
                }
            }
            SessionCommand::Shutdown { reply } => {
                self.cancel_active_turn();
                if reply.send(()).is_err() {
                    debug!(target: "runtime::session", "shutdown reply channel closed (caller dropped)");
                }
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    fn initialize_game(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Uninitialized {
            return Err(self.invalid_phase("initialize_game"));
        }

        for (number, player) in &self.players {
            player.initialize(*number, &self.world);
        }
        self.phase = SessionPhase::Initialized;
        self.event_bus.publish(SessionEvent::GameInitialized);
        info!(target: "runtime::session", players = self.players.len(), "game initialized");
        Ok(())
    }

    fn start_game(&mut self, origin: Origin) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Initialized => {}
            SessionPhase::Ended => return Err(SessionError::GameEnded),
            _ => return Err(self.invalid_phase("start_game")),
        }

        let context = self.resolver.resolve_start(&self.world).map_err(|err| {
            error!(target: "runtime::session", error = %err, "no starting player");
            err
        })?;

        self.phase = SessionPhase::TurnActive;
        self.event_bus.publish(SessionEvent::GameStarted { origin });
        info!(target: "runtime::session", %origin, player = %context.current_player, "game started");
        self.begin_turn(context);

        if self.check_game_end() {
            return Ok(());
        }
        self.play_current()
    }

    /// Closes the current turn and resolves the next one. Does not hand
    /// control to the next player; callers follow up with `play_current`.
    ///
    /// The next turn is resolved before anything is published, so a failed
    /// resolution leaves the current turn untouched.
    fn end_turn(
        &mut self,
        requested: Option<PlayerNumber>,
        expected_turn: Option<u32>,
        origin: Origin,
    ) -> Result<(), SessionError> {
        let ended = self.require_turn("end_turn")?.clone();
        if let Some(requested) = requested {
            if requested != ended.current_player {
                return Err(SessionError::NotCurrentPlayer {
                    current: ended.current_player,
                    requested,
                });
            }
        }
        if let Some(requested) = expected_turn {
            if requested != ended.turn {
                return Err(SessionError::StaleTurn {
                    current: ended.turn,
                    requested,
                });
            }
        }
        let next = self.resolve_next(&ended)?;

        self.cancel_active_turn();
        GameEngine::new(&mut self.world).end_turn(ended.current_player);
        if let InteractionState::UnitSelected(unit) = self.interaction {
            self.event_bus.publish(UnitEvent::Deselected { unit });
        }
        self.interaction = InteractionState::BlockInput;

        info!(
            target: "runtime::session",
            player = %ended.current_player,
            turn = ended.turn,
            %origin,
            "turn ended"
        );
        self.event_bus.publish(SessionEvent::TurnEnded {
            transition: TurnTransition {
                ended: ended.clone(),
                origin,
            },
        });
        if origin.is_local() {
            self.mirror(WireMessage::TurnEnded {
                player: ended.current_player,
                turn: ended.turn,
            });
        }

        self.make_turn_transition(&ended, next);
        Ok(())
    }

    fn resolve_next(&self, ended: &TurnContext) -> Result<TurnContext, SessionError> {
        self.resolver
            .resolve_turn(&self.world, ended)
            .map_err(|err| {
                error!(
                    target: "runtime::session",
                    error = %err,
                    after = %ended.current_player,
                    "turn resolution failed"
                );
                SessionError::from(err)
            })
    }

    fn make_turn_transition(&mut self, ended: &TurnContext, next: TurnContext) {
        debug!(
            target: "runtime::session",
            from = %ended.current_player,
            to = %next.current_player,
            turn = next.turn,
            "turn transition"
        );
        self.begin_turn(next);
    }

    fn begin_turn(&mut self, context: TurnContext) {
        GameEngine::new(&mut self.world).begin_turn(context.current_player);
        self.active_turn = Some(CancelToken::new());
        debug!(
            target: "runtime::session",
            player = %context.current_player,
            turn = context.turn,
            "turn started"
        );
        self.event_bus.publish(SessionEvent::TurnStarted {
            context: context.clone(),
        });
        self.turn = Some(context);
    }

    /// Hands control to the current player.
    ///
    /// A player that cannot act ends its turn immediately; the loop is bounded
    /// by the seat count so a table of departed peers cannot spin forever.
    fn play_current(&mut self) -> Result<(), SessionError> {
        for _ in 0..self.players.len() {
            if self.phase != SessionPhase::TurnActive {
                return Ok(());
            }
            let Some(current) = self.turn.as_ref().map(|ctx| ctx.current_player) else {
                return Ok(());
            };
            let Some(player) = self.players.get(&current).cloned() else {
                warn!(target: "runtime::session", player = %current, "no controller for current player");
                self.interaction = InteractionState::BlockInput;
                return Ok(());
            };

            let start = TurnStart {
                player: current,
                handle: self.handle(),
                cancel: self.active_turn.clone().unwrap_or_default(),
                is_host: self.is_host(),
                peer_gone: self.peer_gone(current),
            };
            debug!(target: "runtime::session", player = %current, kind = %player.kind(), "playing turn");

            match player.play(start) {
                PlayOutcome::AwaitInput => {
                    self.interaction = InteractionState::AwaitInput;
                    return Ok(());
                }
                PlayOutcome::BlockInput => {
                    self.interaction = InteractionState::BlockInput;
                    return Ok(());
                }
                PlayOutcome::EndTurnNow => {
                    info!(target: "runtime::session", player = %current, "peer departed, ending turn on its behalf");
                    self.end_turn(Some(current), None, Origin::Local)?;
                }
            }
        }

        warn!(target: "runtime::session", "no connected player left to hand the turn to");
        self.interaction = InteractionState::BlockInput;
        Ok(())
    }

    fn invoke_game_ended(&mut self, result: GameResult) {
        self.phase = SessionPhase::Ended;
        self.interaction = InteractionState::GameOver;
        self.cancel_active_turn();
        info!(
            target: "runtime::session",
            winners = ?result.winners,
            losers = ?result.losers,
            "game ended"
        );
        self.result = Some(result.clone());
        self.event_bus.publish(SessionEvent::GameEnded { result });
    }

    /// Returns whether the game is over.
    fn check_game_end(&mut self) -> bool {
        let outcome = self
            .end_conditions
            .iter()
            .find_map(|condition| condition.evaluate(&self.world));
        match outcome {
            Some(result) => {
                self.invoke_game_ended(result);
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    fn execute(&mut self, command: Command) -> Result<ExecuteOutcome, SessionError> {
        let current = self.require_turn("execute_command")?.current_player;
        if command.origin == Origin::Network && !self.is_remote(current) {
            return Err(SessionError::LocallyControlled(current));
        }

        let outcome = GameEngine::new(&mut self.world).execute(current, &command.kind)?;
        debug!(
            target: "runtime::session",
            command = command.kind.tag(),
            origin = %command.origin,
            changes = outcome.changes.len(),
            "command executed"
        );

        let Command { kind, origin } = command;
        self.event_bus.publish(AbilityEvent::Used { command });
        for change in &outcome.changes {
            self.event_bus.publish(unit_event(change));
        }
        if origin.is_local() {
            self.mirror(WireMessage::Ability(kind));
        }

        if let InteractionState::UnitSelected(unit) = self.interaction {
            if !self.world.contains_unit(unit) {
                self.interaction = InteractionState::AwaitInput;
            }
        }
        self.check_game_end();
        Ok(outcome)
    }

    // ========================================================================
    // Human input routing
    // ========================================================================

    /// The current player, provided it is a local human who may act now.
    fn require_human_input(&self, operation: &'static str) -> Result<PlayerNumber, SessionError> {
        let current = self.require_turn(operation)?.current_player;
        let is_human = self
            .players
            .get(&current)
            .is_some_and(|player| player.kind() == PlayerKind::Human);
        if !is_human || !self.interaction.accepts_input() {
            return Err(SessionError::InputBlocked);
        }
        Ok(current)
    }

    fn require_playable(&self, unit: UnitId) -> Result<(), SessionError> {
        let playable = self
            .turn
            .as_ref()
            .is_some_and(|ctx| ctx.playable_units(&self.world).contains(&unit));
        if playable {
            Ok(())
        } else {
            Err(SessionError::UnitNotPlayable(unit))
        }
    }

    fn select_unit(&mut self, unit: UnitId) -> Result<(), SessionError> {
        self.require_human_input("select_unit")?;
        self.require_playable(unit)?;

        if let InteractionState::UnitSelected(previous) = self.interaction {
            if previous == unit {
                return Ok(());
            }
            self.world.mark_unit(previous, UnitMark::Friendly)?;
            self.event_bus.publish(UnitEvent::Deselected { unit: previous });
        }
        self.world.mark_unit(unit, UnitMark::Selected)?;
        self.interaction = InteractionState::UnitSelected(unit);
        self.event_bus.publish(UnitEvent::Selected { unit });
        Ok(())
    }

    fn deselect_unit(&mut self) -> Result<(), SessionError> {
        self.require_human_input("deselect_unit")?;

        if let InteractionState::UnitSelected(unit) = self.interaction {
            self.world.mark_unit(unit, UnitMark::Friendly)?;
            self.interaction = InteractionState::AwaitInput;
            self.event_bus.publish(UnitEvent::Deselected { unit });
        }
        Ok(())
    }

    fn submit_human(&mut self, kind: CommandKind) -> Result<ExecuteOutcome, SessionError> {
        self.require_human_input("submit_human_command")?;
        self.require_playable(kind.actor())?;
        self.execute(Command::local(kind))
    }

    // ========================================================================
    // Unit hooks and membership
    // ========================================================================

    fn mark_unit(&mut self, unit: UnitId, mark: UnitMark) -> Result<(), SessionError> {
        self.require_turn("mark_unit")?;
        self.world.mark_unit(unit, mark)?;

        match mark {
            UnitMark::Selected => self.event_bus.publish(UnitEvent::Selected { unit }),
            UnitMark::Finished => {
                self.event_bus.publish(UnitEvent::Finished { unit });
                self.event_bus.publish(UnitEvent::Deselected { unit });
            }
            UnitMark::Normal | UnitMark::Friendly => {
                self.event_bus.publish(UnitEvent::Deselected { unit })
            }
        }
        Ok(())
    }

    fn add_unit(
        &mut self,
        owner: PlayerNumber,
        cell: Option<CellCoord>,
        stats: UnitStats,
    ) -> Result<UnitId, SessionError> {
        if self.phase == SessionPhase::Ended {
            return Err(SessionError::GameEnded);
        }
        let unit = self.world.add_unit(owner, cell, stats)?;
        debug!(target: "runtime::session", %unit, %owner, "unit added");
        self.event_bus.publish(UnitEvent::Added { unit, owner, cell });
        Ok(unit)
    }

    fn peer_disconnected(&mut self, player: PlayerNumber) -> Result<(), SessionError> {
        if !self.departed.insert(player) {
            return Ok(());
        }
        info!(target: "runtime::session", %player, host = self.is_host(), "peer disconnected");

        let is_current = self
            .turn
            .as_ref()
            .is_some_and(|ctx| ctx.current_player == player);
        if self.phase == SessionPhase::TurnActive
            && is_current
            && self.is_remote(player)
            && self.is_host()
        {
            self.end_turn(Some(player), None, Origin::Local)?;
            self.play_current()?;
        }
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            world: self.world.clone(),
            phase: self.phase,
            turn: self.turn.clone(),
            interaction: self.interaction,
            result: self.result.clone(),
        }
    }

    fn invalid_phase(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidPhase {
            operation,
            phase: self.phase,
        }
    }

    /// The active turn, or the reason there is none.
    fn require_turn(&self, operation: &'static str) -> Result<&TurnContext, SessionError> {
        match (self.phase, self.turn.as_ref()) {
            (SessionPhase::TurnActive, Some(turn)) => Ok(turn),
            (SessionPhase::Ended, _) => Err(SessionError::GameEnded),
            _ => Err(self.invalid_phase(operation)),
        }
    }

    fn handle(&self) -> Option<SessionHandle> {
        self.self_tx
            .upgrade()
            .map(|tx| SessionHandle::new(tx, self.event_bus.clone()))
    }

    fn cancel_active_turn(&mut self) {
        if let Some(token) = self.active_turn.take() {
            token.cancel();
        }
    }

    fn is_remote(&self, player: PlayerNumber) -> bool {
        self.players
            .get(&player)
            .is_some_and(|p| p.kind() == PlayerKind::Remote)
    }

    fn is_host(&self) -> bool {
        self.transport
            .as_ref()
            .is_none_or(|transport| transport.is_host())
    }

    fn peer_gone(&self, player: PlayerNumber) -> bool {
        self.departed.contains(&player)
            || self
                .transport
                .as_ref()
                .is_some_and(|transport| !transport.is_peer_connected(player))
    }

    fn mirror(&self, message: WireMessage) {
        let Some(outbound) = &self.outbound else {
            return;
        };
        if outbound.send(message).is_err() {
            warn!(target: "runtime::session", "outbound mirror closed, message not broadcast");
        }
    }
}

fn unit_event(change: &WorldChange) -> UnitEvent {
    match change {
        WorldChange::UnitMoved { unit, from, path } => UnitEvent::Moved {
            unit: *unit,
            from: *from,
            to: path.destination().unwrap_or(*from),
            cost: path.cost,
        },
        WorldChange::UnitAttacked {
            attacker,
            target,
            damage,
            remaining_hit_points,
        } => UnitEvent::Attacked {
            attacker: *attacker,
            target: *target,
            damage: *damage,
            remaining_hit_points: *remaining_hit_points,
        },
        WorldChange::UnitRemoved { unit, owner } => UnitEvent::Removed {
            unit: *unit,
            owner: *owner,
        },
    }
}

fn respond<T>(operation: &'static str, reply: Reply<T>, result: Result<T, SessionError>) {
    if let Err(error) = &result {
        debug!(target: "runtime::session", operation, %error, "request rejected");
    }
    if reply.send(result).is_err() {
        debug!(target: "runtime::session", operation, "reply channel closed (caller dropped)");
    }
}
