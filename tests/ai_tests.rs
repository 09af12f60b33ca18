//! AI integration tests: full duels between automated opponents, the
//! think scheduler against a live engine, and determinism guarantees.

use duelbound::{
    Action, AiConfig, AiPlayer, CardDef, CardId, CardRegistry, Difficulty, Domain, DuelEngine,
    DuelSetup, PerPlayer, Phase, PlayerId, ThinkScheduler,
};

fn registry() -> CardRegistry {
    CardRegistry::with_cards([
        CardDef::unit(CardId::new(1), "Vanguard", "Fury", 1, 0, 3),
        CardDef::unit(CardId::new(2), "Skirmisher", "Fury", 1, 0, 2),
        CardDef::spell(CardId::new(4), "Singe", "Fury", 1, 0, "Deal 2 damage to a unit."),
        CardDef::rune(CardId::new(10), "Fury Rune", Domain::Fury),
        CardDef::battlefield(CardId::new(500), "Shattered Bridge"),
        CardDef::battlefield(CardId::new(501), "Sun Gate"),
        CardDef::legend(CardId::new(900), "Commander", "Fury", 2, 0, "Draw 1 card."),
    ])
}

fn new_duel(seed: u64) -> DuelEngine {
    let deck: Vec<CardId> = std::iter::repeat([CardId::new(1), CardId::new(2), CardId::new(4)])
        .take(6)
        .flatten()
        .collect();
    let setup = DuelSetup::new(
        PerPlayer::with_value(deck),
        PerPlayer::with_value(vec![CardId::new(10); 10]),
        PerPlayer::with_value(CardId::new(900)),
        [CardId::new(500), CardId::new(501)],
    )
    .with_first_player(PlayerId::new(0));
    DuelEngine::new(registry(), setup, seed)
}

/// Whoever should act right now: an unconfirmed mulligan seat, else the
/// priority holder.
fn actor(engine: &DuelEngine) -> PlayerId {
    let state = engine.state();
    if state.phase == Phase::Mulligan {
        PlayerId::both()
            .find(|&p| !state.players[p].mulligan_confirmed)
            .unwrap_or(state.priority)
    } else {
        state.priority
    }
}

fn run_duel(seed: u64, difficulty: Difficulty, max_steps: usize) -> DuelEngine {
    let mut engine = new_duel(seed);
    let mut ais = PerPlayer::new(|p| {
        AiPlayer::new(
            AiConfig::default()
                .with_difficulty(difficulty)
                .with_seed(seed ^ (p.index() as u64 + 1)),
        )
    });

    for _ in 0..max_steps {
        if engine.state().is_over() {
            break;
        }
        let player = actor(&engine);
        let Some(action) = ais[player].decide(&engine, player) else {
            break;
        };
        engine
            .submit(player, &action)
            .expect("AI decisions are pre-validated by simulation");
    }
    engine
}

#[test]
fn test_ai_duel_progresses_without_stalling() {
    let engine = run_duel(42, Difficulty::Medium, 400);
    let state = engine.state();

    assert!(state.is_over() || state.turn >= 3);
    // Global invariants held the whole way.
    for player in PlayerId::both() {
        assert!(state.players[player].score <= duelbound::VICTORY_THRESHOLD);
        assert!(state.players[player].pool.energy >= 0);
    }
}

#[test]
fn test_hard_ai_duels_are_reproducible() {
    let first = run_duel(7, Difficulty::Hard, 200);
    let second = run_duel(7, Difficulty::Hard, 200);

    assert_eq!(first.state().turn, second.state().turn);
    assert_eq!(first.state().winner, second.state().winner);
    for player in PlayerId::both() {
        assert_eq!(
            first.state().players[player].score,
            second.state().players[player].score
        );
    }
}

#[test]
fn test_scheduler_drives_a_live_engine() {
    let mut engine = new_duel(42);
    let mut ai = AiPlayer::new(AiConfig::default().with_think_delay(1));
    let mut scheduler = ai.scheduler();

    // The scheduler thinks for P0's mulligan, survives the delay, and
    // commits a valid action.
    scheduler.schedule(&engine, PlayerId::new(0));
    let mut decided = None;
    for _ in 0..5 {
        if let Some(action) = scheduler.tick(&engine, &mut ai) {
            decided = Some(action);
            break;
        }
    }
    let action = decided.expect("scheduler should fire");
    assert!(matches!(action, Action::ConfirmMulligan { .. }));
    engine.submit(PlayerId::new(0), &action).unwrap();
}

#[test]
fn test_scheduler_drops_stale_thinks() {
    let mut engine = new_duel(42);
    let mut ai = AiPlayer::new(AiConfig::default());
    let mut scheduler = ThinkScheduler::new(3);

    scheduler.schedule(&engine, PlayerId::new(0));
    assert!(scheduler.tick(&engine, &mut ai).is_none());

    // P0 acts on their own before the think fires; the pending think is
    // rescheduled against the new state rather than firing stale.
    engine
        .submit(
            PlayerId::new(0),
            &Action::ConfirmMulligan {
                recycle: Default::default(),
            },
        )
        .unwrap();

    assert!(scheduler.tick(&engine, &mut ai).is_none());
    assert!(scheduler.is_pending());
}
