//! Chain and priority protocol integration tests.
//!
//! These drive the engine exclusively through the public action API:
//! committing plays closes the state, passes alternate, two passes
//! resolve LIFO, and refusals leave state untouched.

use smallvec::smallvec;

use duelbound::{
    Action, ActionError, AiConfig, AiPlayer, BattlefieldId, CardDef, CardId, CardInstance,
    CardRegistry, Destination, Domain, DuelEngine, DuelSetup, InstanceId, PerPlayer, Phase,
    PlayerId, PlaySource, Resolution, Target, UnitRef,
};

const VANGUARD: CardId = CardId::new(1);
const SKIRMISHER: CardId = CardId::new(2);
const SINGE: CardId = CardId::new(4);
const BOLSTER: CardId = CardId::new(5);
const LEGEND: CardId = CardId::new(900);

fn registry() -> CardRegistry {
    CardRegistry::with_cards([
        CardDef::unit(VANGUARD, "Vanguard", "Fury", 1, 0, 3),
        CardDef::unit(SKIRMISHER, "Skirmisher", "Fury", 1, 0, 2),
        CardDef::spell(SINGE, "Singe", "Fury", 1, 0, "Deal 4 damage to a unit."),
        CardDef::spell(BOLSTER, "Bolster", "Order", 1, 0, "Give a unit +2 might this turn."),
        CardDef::rune(CardId::new(10), "Fury Rune", Domain::Fury),
        CardDef::battlefield(CardId::new(500), "Shattered Bridge"),
        CardDef::battlefield(CardId::new(501), "Sun Gate"),
        CardDef::legend(LEGEND, "Commander", "Fury", 1, 0, "Stun a unit."),
    ])
}

fn new_duel() -> DuelEngine {
    let setup = DuelSetup::new(
        PerPlayer::with_value(vec![VANGUARD; 12]),
        PerPlayer::with_value(vec![CardId::new(10); 8]),
        PerPlayer::with_value(LEGEND),
        [CardId::new(500), CardId::new(501)],
    )
    .with_first_player(PlayerId::new(0));
    DuelEngine::new(registry(), setup, 42)
}

fn past_mulligan(engine: &mut DuelEngine) {
    for player in PlayerId::both() {
        engine
            .submit(
                player,
                &Action::ConfirmMulligan {
                    recycle: Default::default(),
                },
            )
            .unwrap();
    }
}

fn to_action_phase(engine: &mut DuelEngine) {
    past_mulligan(engine);
    let turn_player = engine.state().turn_player;
    for _ in 0..4 {
        engine.submit(turn_player, &Action::AdvancePhase).unwrap();
    }
    assert_eq!(engine.state().phase, Phase::Action);
}

fn give_energy(engine: &mut DuelEngine, player: PlayerId, amount: i32) {
    engine.state_mut().players[player].pool.add_energy(amount);
}

fn put_in_hand(engine: &mut DuelEngine, player: PlayerId, card: CardId) -> InstanceId {
    let state = engine.state_mut();
    let id = state.alloc_instance();
    state.add_card(CardInstance::new(id, card, player));
    state.players[player].hand.push_back(id);
    id
}

fn spawn_unit(
    engine: &mut DuelEngine,
    card: CardId,
    owner: PlayerId,
    bf: Option<BattlefieldId>,
    ready: bool,
) -> InstanceId {
    let state = engine.state_mut();
    let id = state.alloc_instance();
    let mut instance = CardInstance::new(id, card, owner);
    instance.ready = ready;
    state.add_card(instance);
    match bf {
        Some(bf) => state.battlefield_mut(bf).units[owner].push_back(id),
        None => state.players[owner].base_units.push_back(id),
    }
    id
}

fn target_unit(engine: &DuelEngine, instance: InstanceId) -> Target {
    let (owner, zone) = engine.state().find_unit(instance).unwrap();
    Target::Unit(UnitRef {
        owner,
        instance,
        zone,
    })
}

#[test]
fn test_pass_with_nothing_pending_is_refused() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);

    let err = engine
        .submit(PlayerId::new(0), &Action::PassPriority)
        .unwrap_err();
    assert_eq!(err, ActionError::NothingPending);
    assert!(engine.state().log.contains("refused pass priority"));
}

#[test]
fn test_play_closes_state_and_hands_priority() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);

    let victim = spawn_unit(&mut engine, SKIRMISHER, p0.opponent(), None, false);
    let spell = put_in_hand(&mut engine, p0, SINGE);
    give_energy(&mut engine, p0, 1);

    let target = target_unit(&engine, victim);
    engine
        .submit(
            p0,
            &Action::PlayCard {
                source: PlaySource::Hand,
                card: spell,
                destination: None,
                accelerate: false,
                targets: smallvec![target],
                auto_pay: false,
            },
        )
        .unwrap();

    assert_eq!(engine.state().resolution, Resolution::Closed);
    assert_eq!(engine.state().chain.len(), 1);
    assert_eq!(engine.state().priority, p0);
}

#[test]
fn test_two_passes_resolve_the_top_item() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);
    let p1 = p0.opponent();

    let victim = spawn_unit(&mut engine, VANGUARD, p1, None, false);
    let spell = put_in_hand(&mut engine, p0, SINGE);
    give_energy(&mut engine, p0, 1);

    let target = target_unit(&engine, victim);
    engine
        .submit(
            p0,
            &Action::PlayCard {
                source: PlaySource::Hand,
                card: spell,
                destination: None,
                accelerate: false,
                targets: smallvec![target],
                auto_pay: false,
            },
        )
        .unwrap();

    engine.submit(p0, &Action::PassPriority).unwrap();
    engine.submit(p1, &Action::PassPriority).unwrap();

    // 4 damage killed the might-3 Vanguard.
    assert!(engine.state().find_unit(victim).is_none());
    assert!(engine.state().players[p1].trash.contains(&victim));
    assert!(engine.state().chain.is_empty());
    assert_eq!(engine.state().resolution, Resolution::Open);
    assert_eq!(engine.state().priority, p0);
}

#[test]
fn test_lifo_response_resolves_first() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);
    let p1 = p0.opponent();

    // P0 buffs their own Vanguard; P1 responds with 4 damage. LIFO means
    // the damage lands while the Vanguard is still might 3: it dies, and
    // the buff fizzles on a stale target.
    let vanguard = spawn_unit(&mut engine, VANGUARD, p0, None, false);
    let bolster = put_in_hand(&mut engine, p0, BOLSTER);
    let singe = put_in_hand(&mut engine, p1, SINGE);
    give_energy(&mut engine, p0, 1);
    give_energy(&mut engine, p1, 1);

    let target = target_unit(&engine, vanguard);
    engine
        .submit(
            p0,
            &Action::PlayCard {
                source: PlaySource::Hand,
                card: bolster,
                destination: None,
                accelerate: false,
                targets: smallvec![target],
                auto_pay: false,
            },
        )
        .unwrap();
    engine.submit(p0, &Action::PassPriority).unwrap();

    engine
        .submit(
            p1,
            &Action::PlayCard {
                source: PlaySource::Hand,
                card: singe,
                destination: None,
                accelerate: false,
                targets: smallvec![target],
                auto_pay: false,
            },
        )
        .unwrap();
    assert_eq!(engine.state().chain.len(), 2);

    // Resolve the response first...
    engine.submit(p1, &Action::PassPriority).unwrap();
    engine.submit(p0, &Action::PassPriority).unwrap();
    assert!(engine.state().find_unit(vanguard).is_none());
    assert_eq!(engine.state().chain.len(), 1);

    // ...then the original buff, which now has no legal target.
    engine.submit(p0, &Action::PassPriority).unwrap();
    engine.submit(p1, &Action::PassPriority).unwrap();
    assert!(engine.state().chain.is_empty());
}

#[test]
fn test_only_priority_holder_may_act() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);
    let p1 = p0.opponent();

    let spell = put_in_hand(&mut engine, p1, SINGE);
    give_energy(&mut engine, p1, 1);

    // P1 has no priority in P0's open action phase.
    let err = engine
        .submit(
            p1,
            &Action::PlayCard {
                source: PlaySource::Hand,
                card: spell,
                destination: None,
                accelerate: false,
                targets: Default::default(),
                auto_pay: false,
            },
        )
        .unwrap_err();
    assert_eq!(err, ActionError::NotPriorityHolder);
}

#[test]
fn test_set_targets_on_top_item() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);
    let p1 = p0.opponent();

    let victim = spawn_unit(&mut engine, SKIRMISHER, p1, None, false);
    give_energy(&mut engine, p0, 1);

    // The legend ability ("Stun a unit.") goes on the chain untargeted.
    engine.submit(p0, &Action::ActivateLegend).unwrap();
    assert!(engine.state().chain_top().unwrap().awaiting_targets());

    let target = target_unit(&engine, victim);
    engine
        .submit(
            p0,
            &Action::SetChainTargets {
                targets: smallvec![target],
            },
        )
        .unwrap();

    engine.submit(p0, &Action::PassPriority).unwrap();
    engine.submit(p1, &Action::PassPriority).unwrap();

    assert!(engine.state().card(victim).unwrap().stunned);
}

#[test]
fn test_legend_once_per_turn() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);
    let p1 = p0.opponent();

    spawn_unit(&mut engine, SKIRMISHER, p1, None, false);
    give_energy(&mut engine, p0, 2);

    engine.submit(p0, &Action::ActivateLegend).unwrap();
    engine.submit(p0, &Action::PassPriority).unwrap();
    engine.submit(p1, &Action::PassPriority).unwrap();

    let err = engine.submit(p0, &Action::ActivateLegend).unwrap_err();
    assert_eq!(err, ActionError::LegendUsed);
}

#[test]
fn test_malformed_actions_rejected_before_state() {
    let mut engine = new_duel();
    let p0 = PlayerId::new(0);

    let err = engine
        .submit(
            p0,
            &Action::ConfirmMulligan {
                recycle: smallvec![InstanceId::new(1), InstanceId::new(2), InstanceId::new(3)],
            },
        )
        .unwrap_err();
    assert!(matches!(err, ActionError::Malformed(_)));

    let err = engine
        .submit(
            p0,
            &Action::StandardMove {
                units: Default::default(),
                to: Destination::Base,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ActionError::Malformed(_)));

    // A wrong player tag never touches state.
    let err = engine
        .submit(PlayerId::new(7), &Action::PassPriority)
        .unwrap_err();
    assert_eq!(err, ActionError::InvalidPlayer(PlayerId::new(7)));
}

#[test]
fn test_refusal_leaves_state_unchanged() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);

    let spell = put_in_hand(&mut engine, p0, SINGE);
    let hand_before = engine.state().players[p0].hand.len();

    // No energy, no auto-pay plan (no runes in play).
    let err = engine
        .submit(
            p0,
            &Action::PlayCard {
                source: PlaySource::Hand,
                card: spell,
                destination: None,
                accelerate: false,
                targets: Default::default(),
                auto_pay: false,
            },
        )
        .unwrap_err();
    assert_eq!(err, ActionError::CannotAfford);
    assert_eq!(engine.state().players[p0].hand.len(), hand_before);
    assert!(engine.state().chain.is_empty());
    assert!(engine.state().log.contains("refused play card"));
}

#[test]
fn test_auto_pay_spell_through_runes() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);
    let p1 = p0.opponent();

    let victim = spawn_unit(&mut engine, SKIRMISHER, p1, None, false);
    let spell = put_in_hand(&mut engine, p0, SINGE);

    // The channel phase left two ready runes in play and an empty pool.
    let ready_before = engine.state().players[p0].ready_rune_count();
    assert_eq!(ready_before, 2);

    let target = target_unit(&engine, victim);
    engine
        .submit(
            p0,
            &Action::PlayCard {
                source: PlaySource::Hand,
                card: spell,
                destination: None,
                accelerate: false,
                targets: smallvec![target],
                auto_pay: true,
            },
        )
        .unwrap();

    // Exactly one rune was exhausted for the energy cost, nothing left over.
    assert_eq!(engine.state().players[p0].ready_rune_count(), ready_before - 1);
    assert_eq!(engine.state().players[p0].pool.energy, 0);
}

#[test]
fn test_ai_can_respond_on_the_chain() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);
    let p1 = p0.opponent();

    let vanguard = spawn_unit(&mut engine, VANGUARD, p0, None, false);
    let bolster = put_in_hand(&mut engine, p0, BOLSTER);
    give_energy(&mut engine, p0, 1);

    let target = target_unit(&engine, vanguard);
    engine
        .submit(
            p0,
            &Action::PlayCard {
                source: PlaySource::Hand,
                card: bolster,
                destination: None,
                accelerate: false,
                targets: smallvec![target],
                auto_pay: false,
            },
        )
        .unwrap();
    engine.submit(p0, &Action::PassPriority).unwrap();

    // P1 now holds priority in a closed state; the AI must produce a
    // legal reaction (passing is always available).
    let mut ai = AiPlayer::new(AiConfig::default());
    let action = ai.decide(&engine, p1).unwrap();
    engine.submit(p1, &action).unwrap();
}
