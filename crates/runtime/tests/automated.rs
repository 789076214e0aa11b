mod common;

use std::sync::Arc;
use std::time::Duration;

use behavior_tree::Sequence;
use common::{P0, P1, drain, fragile, instant_config, settle, strip};
use game_core::{CellCoord, Command, CommandKind, Origin, PlayerNumber, UnitId, UnitStats};
use runtime::ai::nodes::{AttackBestTarget, EnemyInRange, HasActionPoints};
use runtime::{
    AbilityEvent, AiContext, AutomatedConfig, Event, InteractionState, Runtime, RuntimeConfig,
    SelectionStrategy, SessionPhase, Topic, UnitEvent, UnitTree,
};

fn local_abilities(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::Ability(AbilityEvent::Used { command }) if command.origin == Origin::Local
            )
        })
        .count()
}

#[tokio::test(start_paused = true)]
async fn automated_turn_closes_in_and_hands_over() {
    let runtime = Runtime::builder()
        .config(instant_config())
        .world(strip(5, Default::default()))
        .automated(P0, SelectionStrategy::Subsequent)
        .human(P1)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut units = runtime.subscribe(Topic::Unit);

    handle.initialize_game().await.unwrap();
    handle.start_game(Origin::Local).await.unwrap();
    settle().await;

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.current_player(), Some(P1));
    assert_eq!(snapshot.interaction, InteractionState::AwaitInput);

    let mover = snapshot.world.unit(UnitId(0)).unwrap();
    let target = snapshot.world.unit(UnitId(1)).unwrap();
    assert_eq!(mover.cell, Some(CellCoord::new(3, 0)));
    assert_eq!(target.hit_points, 8);

    let events = drain(&mut units);
    let first = events.first().cloned();
    assert_eq!(first, Some(Event::Unit(UnitEvent::Selected { unit: UnitId(0) })));
    assert!(events.contains(&Event::Unit(UnitEvent::Finished { unit: UnitId(0) })));

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn game_end_before_the_first_unit_cancels_the_turn() {
    let mut world = strip(2, [UnitStats::default(), fragile()]);
    world
        .add_unit(P0, Some(CellCoord::new(0, 0)), UnitStats::default())
        .unwrap();

    let runtime = Runtime::builder()
        .config(RuntimeConfig::default())
        .world(world)
        .automated(P0, SelectionStrategy::MobilityBased)
        .human(P1)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut abilities = runtime.subscribe(Topic::Ability);
    let mut units = runtime.subscribe(Topic::Unit);

    handle.initialize_game().await.unwrap();
    handle.start_game(Origin::Local).await.unwrap();

    // The kill lands while the automated player is still waiting for its
    // turn start delay.
    handle
        .execute_command(Command::local(CommandKind::Attack {
            attacker: UnitId(0),
            target: UnitId(1),
        }))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, SessionPhase::Ended);
    // Only the kill above; the automated player never acted.
    assert_eq!(local_abilities(&drain(&mut abilities)), 1);
    assert!(
        !drain(&mut units)
            .iter()
            .any(|e| matches!(e, Event::Unit(UnitEvent::Selected { .. })))
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn debug_mode_waits_for_a_step_per_unit() {
    let config = RuntimeConfig {
        automated: AutomatedConfig {
            debug_mode: true,
            ..AutomatedConfig::instant()
        },
        ..RuntimeConfig::default()
    };
    let world = strip(2, [UnitStats::default(), UnitStats::default()]);
    let runtime = Runtime::builder()
        .config(config)
        .world(world)
        .automated(P0, SelectionStrategy::Subsequent)
        .human(P1)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut abilities = runtime.subscribe(Topic::Ability);

    handle.initialize_game().await.unwrap();
    handle.start_game(Origin::Local).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(local_abilities(&drain(&mut abilities)), 0);
    assert_eq!(handle.snapshot().await.unwrap().current_player(), Some(P0));

    runtime.debug_step();
    settle().await;

    assert_eq!(local_abilities(&drain(&mut abilities)), 1);
    assert_eq!(handle.snapshot().await.unwrap().current_player(), Some(P1));

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn ending_the_turn_externally_stops_remaining_units() {
    let mut world = strip(6, Default::default());
    for _ in 0..2 {
        world
            .add_unit(PlayerNumber(0), None, UnitStats::default())
            .unwrap();
    }
    let runtime = Runtime::builder()
        .config(RuntimeConfig::default())
        .world(world)
        .automated(P0, SelectionStrategy::Subsequent)
        .human(P1)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut units = runtime.subscribe(Topic::Unit);

    handle.initialize_game().await.unwrap();
    handle.start_game(Origin::Local).await.unwrap();

    // Past the turn start delay, inside the first unit's delay.
    tokio::time::sleep(Duration::from_millis(600)).await;
    handle.end_turn_for(P0, Origin::Network).await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;

    let selected: Vec<_> = drain(&mut units)
        .into_iter()
        .filter_map(|e| match e {
            Event::Unit(UnitEvent::Selected { unit }) => Some(unit),
            _ => None,
        })
        .collect();
    assert_eq!(selected, vec![UnitId(0)]);
    assert_eq!(handle.snapshot().await.unwrap().current_player(), Some(P1));

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn custom_tree_replaces_the_default_one() {
    // Strikes whatever is in reach, never moves.
    let hold: UnitTree = Arc::new(Sequence::<AiContext>::new(vec![
        Box::new(HasActionPoints),
        Box::new(EnemyInRange),
        Box::new(AttackBestTarget::default()),
    ]));
    let runtime = Runtime::builder()
        .config(instant_config())
        .world(strip(5, Default::default()))
        .automated_with(P0, hold, SelectionStrategy::Subsequent)
        .human(P1)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    handle.initialize_game().await.unwrap();
    handle.start_game(Origin::Local).await.unwrap();
    settle().await;

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.current_player(), Some(P1));
    assert_eq!(
        snapshot.world.unit(UnitId(0)).unwrap().cell,
        Some(CellCoord::new(0, 0))
    );
    assert_eq!(snapshot.world.unit(UnitId(1)).unwrap().hit_points, 10);

    runtime.shutdown().await.unwrap();
}
