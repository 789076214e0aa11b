mod common;

use common::{P0, P1, drain, fragile, strip};
use game_core::{
    CellCoord, Command, CommandKind, GameEndCondition, GameResult, Origin, Topology, TurnContext,
    TurnError, UnitId, UnitStats, World,
};
use runtime::{
    Event, InteractionState, Runtime, RuntimeError, SessionError, SessionEvent, SessionPhase,
    Topic, UnitEvent,
};

async fn two_humans(world: game_core::World) -> Runtime {
    Runtime::builder()
        .world(world)
        .human(P0)
        .human(P1)
        .build()
        .await
        .expect("runtime should build")
}

fn session_error(result: runtime::Result<impl std::fmt::Debug>) -> SessionError {
    match result {
        Err(RuntimeError::Session(error)) => error,
        other => panic!("expected a session error, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn lifecycle_calls_out_of_order_are_rejected() {
    let runtime = two_humans(strip(4, Default::default())).await;
    let handle = runtime.handle();
    let mut lifecycle = runtime.subscribe(Topic::Lifecycle);

    // ================================================================
    // Start before initialization
    // ================================================================
    assert_eq!(
        session_error(handle.start_game(Origin::Local).await),
        SessionError::InvalidPhase {
            operation: "start_game",
            phase: SessionPhase::Uninitialized,
        }
    );

    // ================================================================
    // Initialize twice
    // ================================================================
    handle.initialize_game().await.unwrap();
    assert!(matches!(
        session_error(handle.initialize_game().await),
        SessionError::InvalidPhase { .. }
    ));

    // ================================================================
    // Start, then end a turn that isn't ours
    // ================================================================
    handle.start_game(Origin::Local).await.unwrap();
    assert_eq!(
        session_error(handle.end_turn_for(P1, Origin::Local).await),
        SessionError::NotCurrentPlayer {
            current: P0,
            requested: P1,
        }
    );

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, SessionPhase::TurnActive);
    assert_eq!(snapshot.current_player(), Some(P0));
    assert_eq!(snapshot.interaction, InteractionState::AwaitInput);

    assert_eq!(
        drain(&mut lifecycle),
        vec![
            Event::Session(SessionEvent::GameInitialized),
            Event::Session(SessionEvent::GameStarted {
                origin: Origin::Local
            }),
            Event::Session(SessionEvent::TurnStarted {
                context: TurnContext::new(1, P0)
            }),
        ]
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn duel_alternates_and_returns_after_a_kill() {
    let mut world = strip(3, [UnitStats::default(), fragile()]);
    // A second unit for player 1 so the game survives the first kill.
    world
        .add_unit(P1, Some(CellCoord::new(2, 0)), UnitStats::default())
        .unwrap();
    let runtime = two_humans(world).await;
    let handle = runtime.handle();

    handle.initialize_game().await.unwrap();
    handle.start_game(Origin::Local).await.unwrap();

    let current = |s: runtime::SessionSnapshot| s.turn.map(|t| (t.turn, t.current_player));
    assert_eq!(current(handle.snapshot().await.unwrap()), Some((1, P0)));

    handle.end_turn(Origin::Local).await.unwrap();
    assert_eq!(current(handle.snapshot().await.unwrap()), Some((2, P1)));

    // Player 1 walks its fragile unit next to player 0 and ends the turn.
    handle
        .submit_human_command(CommandKind::Move {
            unit: UnitId(1),
            destination: CellCoord::new(1, 0),
        })
        .await
        .unwrap();
    handle.end_turn(Origin::Local).await.unwrap();
    assert_eq!(current(handle.snapshot().await.unwrap()), Some((3, P0)));

    let outcome = handle
        .submit_human_command(CommandKind::Attack {
            attacker: UnitId(0),
            target: UnitId(1),
        })
        .await
        .unwrap();
    assert_eq!(outcome.removed_units().collect::<Vec<_>>(), vec![UnitId(1)]);

    handle.end_turn(Origin::Local).await.unwrap();
    assert_eq!(current(handle.snapshot().await.unwrap()), Some((4, P1)));
    handle.end_turn(Origin::Local).await.unwrap();
    assert_eq!(current(handle.snapshot().await.unwrap()), Some((5, P0)));

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn human_input_is_routed_to_the_current_player_only() {
    let runtime = two_humans(strip(4, Default::default())).await;
    let handle = runtime.handle();
    let mut units = runtime.subscribe(Topic::Unit);

    handle.initialize_game().await.unwrap();
    assert_eq!(
        session_error(handle.select_unit(UnitId(0)).await),
        SessionError::InvalidPhase {
            operation: "select_unit",
            phase: SessionPhase::Initialized,
        }
    );
    handle.start_game(Origin::Local).await.unwrap();

    assert_eq!(
        session_error(handle.select_unit(UnitId(1)).await),
        SessionError::UnitNotPlayable(UnitId(1))
    );

    handle.select_unit(UnitId(0)).await.unwrap();
    assert_eq!(
        handle.snapshot().await.unwrap().interaction,
        InteractionState::UnitSelected(UnitId(0))
    );

    handle
        .submit_human_command(CommandKind::Move {
            unit: UnitId(0),
            destination: CellCoord::new(2, 0),
        })
        .await
        .unwrap();
    handle.deselect_unit().await.unwrap();

    assert_eq!(
        drain(&mut units),
        vec![
            Event::Unit(UnitEvent::Selected { unit: UnitId(0) }),
            Event::Unit(UnitEvent::Moved {
                unit: UnitId(0),
                from: CellCoord::new(0, 0),
                to: CellCoord::new(2, 0),
                cost: 2,
            }),
            Event::Unit(UnitEvent::Deselected { unit: UnitId(0) }),
        ]
    );

    // Out of movement points: the engine rejects, the world is untouched.
    let rejected = handle
        .submit_human_command(CommandKind::Move {
            unit: UnitId(0),
            destination: CellCoord::new(0, 0),
        })
        .await;
    assert!(matches!(
        session_error(rejected),
        SessionError::Execute(_)
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn ended_game_rejects_every_mutation() {
    let runtime = two_humans(strip(2, [UnitStats::default(), fragile()])).await;
    let handle = runtime.handle();
    let mut lifecycle = runtime.subscribe(Topic::Lifecycle);

    handle.initialize_game().await.unwrap();
    handle.start_game(Origin::Local).await.unwrap();
    handle
        .execute_command(Command::local(CommandKind::Attack {
            attacker: UnitId(0),
            target: UnitId(1),
        }))
        .await
        .unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.is_over());
    assert_eq!(snapshot.interaction, InteractionState::GameOver);
    let result = snapshot.result.expect("result is recorded");
    assert_eq!(result.winners, vec![P0]);
    assert_eq!(result.losers, vec![P1]);

    assert_eq!(
        session_error(handle.end_turn(Origin::Local).await),
        SessionError::GameEnded
    );
    assert_eq!(
        session_error(handle.start_game(Origin::Local).await),
        SessionError::GameEnded
    );
    assert_eq!(
        session_error(
            handle
                .add_unit(P1, Some(CellCoord::new(1, 0)), UnitStats::default())
                .await
        ),
        SessionError::GameEnded
    );

    let ended = drain(&mut lifecycle)
        .into_iter()
        .filter(|e| matches!(e, Event::Session(SessionEvent::GameEnded { .. })))
        .count();
    assert_eq!(ended, 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn added_units_join_the_current_turn() {
    let runtime = two_humans(strip(4, Default::default())).await;
    let handle = runtime.handle();
    let mut units = runtime.subscribe(Topic::Unit);

    handle.initialize_game().await.unwrap();
    handle.start_game(Origin::Local).await.unwrap();

    let reinforcement = handle
        .add_unit(P0, Some(CellCoord::new(1, 0)), UnitStats::default())
        .await
        .unwrap();
    assert_eq!(reinforcement, UnitId(2));
    assert_eq!(
        drain(&mut units),
        vec![Event::Unit(UnitEvent::Added {
            unit: UnitId(2),
            owner: P0,
            cell: Some(CellCoord::new(1, 0)),
        })]
    );

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.playable_units().contains(&reinforcement));

    runtime.shutdown().await.unwrap();
}

/// Keeps the game going regardless of the board.
struct Endless;

impl GameEndCondition for Endless {
    fn evaluate(&self, _world: &World) -> Option<GameResult> {
        None
    }
}

#[tokio::test(start_paused = true)]
async fn failed_turn_resolution_leaves_the_turn_in_place() {
    let mut world = World::with_players(Topology::Square, 2).unwrap();
    world.fill_rect(2, 1);
    let runtime = Runtime::builder()
        .world(world)
        .end_condition(Endless)
        .human(P0)
        .human(P1)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut lifecycle = runtime.subscribe(Topic::Lifecycle);

    handle.initialize_game().await.unwrap();
    handle.start_game(Origin::Local).await.unwrap();
    drain(&mut lifecycle);

    assert_eq!(
        session_error(handle.end_turn(Origin::Local).await),
        SessionError::Turn(TurnError::NoEligiblePlayer { after: P0 })
    );

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, SessionPhase::TurnActive);
    assert_eq!(snapshot.turn, Some(TurnContext::new(1, P0)));
    assert_eq!(snapshot.interaction, InteractionState::AwaitInput);
    assert!(drain(&mut lifecycle).is_empty());

    runtime.shutdown().await.unwrap();
}
