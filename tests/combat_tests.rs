//! Combat, showdown, and scoring integration tests.
//!
//! Scenarios are staged on a real duel (units injected at base or
//! battlefields), then driven through the public API: standard moves
//! contest battlefields, two passes close the showdown, damage is
//! auto-assigned, two more passes resolve the outcome.

use smallvec::smallvec;

use duelbound::{
    Action, BattlefieldId, CardDef, CardId, CardInstance, CardRegistry, CombatStep, Destination,
    Domain, DuelEngine, DuelSetup, InstanceId, Keyword, PerPlayer, Phase, PlayerId, Window,
    VICTORY_THRESHOLD,
};

const VANGUARD: CardId = CardId::new(1); // might 3
const SKIRMISHER: CardId = CardId::new(2); // might 2
const WARDEN: CardId = CardId::new(3); // might 4, Tank
const WATCHER: CardId = CardId::new(7); // might 0
const LEGEND: CardId = CardId::new(900);

const BF0: BattlefieldId = BattlefieldId::new(0);
const BF1: BattlefieldId = BattlefieldId::new(1);

fn registry() -> CardRegistry {
    CardRegistry::with_cards([
        CardDef::unit(VANGUARD, "Vanguard", "Fury", 1, 0, 3),
        CardDef::unit(SKIRMISHER, "Skirmisher", "Fury", 1, 0, 2),
        CardDef::unit(WARDEN, "Warden", "Order", 2, 0, 4).with_keyword(Keyword::Tank),
        CardDef::unit(WATCHER, "Watcher", "Calm", 0, 0, 0),
        CardDef::rune(CardId::new(10), "Fury Rune", Domain::Fury),
        CardDef::battlefield(CardId::new(500), "Shattered Bridge"),
        CardDef::battlefield(CardId::new(501), "Sun Gate"),
        CardDef::legend(LEGEND, "Commander", "Fury", 2, 0, "Draw 1 card."),
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

fn to_action_phase(engine: &mut DuelEngine) {
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
    let turn_player = engine.state().turn_player;
    for _ in 0..4 {
        engine.submit(turn_player, &Action::AdvancePhase).unwrap();
    }
    assert_eq!(engine.state().phase, Phase::Action);
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

fn both_pass(engine: &mut DuelEngine) {
    let first = engine.state().priority;
    engine.submit(first, &Action::PassPriority).unwrap();
    let second = engine.state().priority;
    engine.submit(second, &Action::PassPriority).unwrap();
}

/// Two units (might 3 + 2) attack one might-4 defender: the defender
/// dies, the attacking side survives, the battlefield is conquered.
#[test]
fn test_attack_conquers_when_only_attacker_survives() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);
    let p1 = p0.opponent();

    engine.state_mut().battlefield_mut(BF0).controller = Some(p1);
    let warden = spawn_unit(&mut engine, WARDEN, p1, Some(BF0), false);
    let vanguard = spawn_unit(&mut engine, VANGUARD, p0, None, true);
    let skirmisher = spawn_unit(&mut engine, SKIRMISHER, p0, None, true);

    engine
        .submit(
            p0,
            &Action::StandardMove {
                units: smallvec![vanguard, skirmisher],
                to: Destination::Battlefield(BF0),
            },
        )
        .unwrap();
    assert_eq!(engine.state().window, Window::Showdown(BF0));

    // Close the showdown: both sides have units, so combat begins and
    // damage is auto-assigned.
    both_pass(&mut engine);
    assert_eq!(
        engine.state().window,
        Window::Combat {
            battlefield: BF0,
            step: CombatStep::Damage
        }
    );

    // Attacker total 5 killed the Warden; the defender's 4 killed the
    // Vanguard (lethal 3) and left 1 on the Skirmisher.
    assert!(engine.state().find_unit(warden).is_none());
    assert!(engine.state().find_unit(vanguard).is_none());
    assert_eq!(engine.state().card(skirmisher).unwrap().damage, 1);

    // Resolution: only the attacker survived. No recall, and the
    // battlefield changes hands, scoring the conquest.
    both_pass(&mut engine);
    assert_eq!(engine.state().window, Window::None);
    assert_eq!(engine.state().battlefield(BF0).controller, Some(p0));
    assert_eq!(engine.state().battlefield(BF0).contester, None);
    assert_eq!(engine.state().players[p0].score, 1);
    assert!(engine.state().battlefield(BF0).units[p0].contains(&skirmisher));
}

/// Both sides survive: the tie favors the defender. Attackers recall to
/// base exhausted and control does not change.
#[test]
fn test_tie_recalls_attackers_exhausted() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);
    let p1 = p0.opponent();

    engine.state_mut().battlefield_mut(BF0).controller = Some(p1);
    // Defender: Skirmisher (2) plus a zero-might Watcher to soak spill.
    spawn_unit(&mut engine, SKIRMISHER, p1, Some(BF0), false);
    let watcher = spawn_unit(&mut engine, WATCHER, p1, Some(BF0), false);
    // Attacker: Warden (4) plus a Watcher of their own.
    let warden = spawn_unit(&mut engine, WARDEN, p0, None, true);
    let own_watcher = spawn_unit(&mut engine, WATCHER, p0, None, true);

    engine
        .submit(
            p0,
            &Action::StandardMove {
                units: smallvec![warden, own_watcher],
                to: Destination::Battlefield(BF0),
            },
        )
        .unwrap();
    both_pass(&mut engine); // showdown -> combat damage
    both_pass(&mut engine); // damage -> resolution

    // Defender keeps control; surviving attackers recalled exhausted.
    assert_eq!(engine.state().battlefield(BF0).controller, Some(p1));
    assert_eq!(engine.state().battlefield(BF0).contester, None);
    assert_eq!(engine.state().players[p0].score, 0);

    assert!(engine.state().players[p0].base_units.contains(&warden));
    assert!(!engine.state().card(warden).unwrap().ready);
    assert!(engine.state().players[p0].base_units.contains(&own_watcher));

    // The defender's zero-might Watcher soaked spill damage and lives.
    assert!(engine.state().find_unit(watcher).is_some());
}

/// Mutual annihilation leaves the battlefield uncontrolled.
#[test]
fn test_mutual_destruction_clears_control() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);
    let p1 = p0.opponent();

    engine.state_mut().battlefield_mut(BF0).controller = Some(p1);
    spawn_unit(&mut engine, VANGUARD, p1, Some(BF0), false);
    let attacker = spawn_unit(&mut engine, VANGUARD, p0, None, true);

    engine
        .submit(
            p0,
            &Action::StandardMove {
                units: smallvec![attacker],
                to: Destination::Battlefield(BF0),
            },
        )
        .unwrap();
    both_pass(&mut engine);
    both_pass(&mut engine);

    assert_eq!(engine.state().battlefield(BF0).controller, None);
    assert_eq!(engine.state().battlefield(BF0).contester, None);
}

/// Moving into an empty enemy-held battlefield conquers it unopposed.
#[test]
fn test_unopposed_showdown_conquers() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);
    let p1 = p0.opponent();

    engine.state_mut().battlefield_mut(BF1).controller = Some(p1);
    let attacker = spawn_unit(&mut engine, VANGUARD, p0, None, true);

    engine
        .submit(
            p0,
            &Action::StandardMove {
                units: smallvec![attacker],
                to: Destination::Battlefield(BF1),
            },
        )
        .unwrap();
    assert_eq!(engine.state().window, Window::Showdown(BF1));

    both_pass(&mut engine);

    assert_eq!(engine.state().window, Window::None);
    assert_eq!(engine.state().battlefield(BF1).controller, Some(p0));
    assert_eq!(engine.state().players[p0].score, 1);
}

/// Conquering unclaimed ground takes control but awards no point.
#[test]
fn test_conquering_unclaimed_ground_scores_nothing() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);

    let attacker = spawn_unit(&mut engine, VANGUARD, p0, None, true);
    engine
        .submit(
            p0,
            &Action::StandardMove {
                units: smallvec![attacker],
                to: Destination::Battlefield(BF0),
            },
        )
        .unwrap();
    both_pass(&mut engine);

    assert_eq!(engine.state().battlefield(BF0).controller, Some(p0));
    assert_eq!(engine.state().players[p0].score, 0);
}

/// The Final Point cannot be taken via Conquer unless every other
/// battlefield was scored this turn; the denied attempt draws a card.
#[test]
fn test_final_point_denied_draws_instead() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);
    let p1 = p0.opponent();

    engine.state_mut().players[p0].score = VICTORY_THRESHOLD - 1;
    engine.state_mut().battlefield_mut(BF1).controller = Some(p1);
    let attacker = spawn_unit(&mut engine, VANGUARD, p0, None, true);
    let hand_before = engine.state().players[p0].hand.len();

    engine
        .submit(
            p0,
            &Action::StandardMove {
                units: smallvec![attacker],
                to: Destination::Battlefield(BF1),
            },
        )
        .unwrap();
    both_pass(&mut engine);

    // Control changed, but no point: a consolation card instead.
    assert_eq!(engine.state().battlefield(BF1).controller, Some(p0));
    assert_eq!(engine.state().players[p0].score, VICTORY_THRESHOLD - 1);
    assert_eq!(engine.state().players[p0].hand.len(), hand_before + 1);
    assert!(!engine.state().is_over());
    assert!(engine.state().log.contains("denied the Final Point"));
}

/// Having Held the other battlefield this turn, the Conquer point is
/// allowed and ends the game at the threshold.
#[test]
fn test_final_point_allowed_after_scoring_every_battlefield() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);
    let p1 = p0.opponent();

    engine.state_mut().players[p0].score = VICTORY_THRESHOLD - 1;
    engine.state_mut().players[p0].mark_scored(BF0);
    engine.state_mut().battlefield_mut(BF1).controller = Some(p1);
    let attacker = spawn_unit(&mut engine, VANGUARD, p0, None, true);

    engine
        .submit(
            p0,
            &Action::StandardMove {
                units: smallvec![attacker],
                to: Destination::Battlefield(BF1),
            },
        )
        .unwrap();
    both_pass(&mut engine);

    assert_eq!(engine.state().players[p0].score, VICTORY_THRESHOLD);
    assert_eq!(engine.state().winner, Some(p0));
}

/// Hold: controlling a battlefield at your scoring step scores once per
/// battlefield per turn.
#[test]
fn test_hold_scores_at_scoring_step() {
    let mut engine = new_duel();
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
    let p0 = PlayerId::new(0);
    engine.state_mut().battlefield_mut(BF0).controller = Some(p0);

    assert_eq!(engine.state().phase, Phase::Awaken);
    engine.submit(p0, &Action::AdvancePhase).unwrap();

    assert_eq!(engine.state().phase, Phase::Scoring);
    assert_eq!(engine.state().players[p0].score, 1);
    assert!(engine.state().players[p0].has_scored(BF0));
}

/// A move cannot be made with exhausted or stunned units.
#[test]
fn test_moves_require_ready_unstunned_units() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);

    let tired = spawn_unit(&mut engine, VANGUARD, p0, None, false);
    let err = engine
        .submit(
            p0,
            &Action::StandardMove {
                units: smallvec![tired],
                to: Destination::Battlefield(BF0),
            },
        )
        .unwrap_err();
    assert_eq!(err, duelbound::ActionError::NotReady);

    let stunned = spawn_unit(&mut engine, VANGUARD, p0, None, true);
    engine.state_mut().card_mut(stunned).unwrap().stunned = true;
    let err = engine
        .submit(
            p0,
            &Action::StandardMove {
                units: smallvec![stunned],
                to: Destination::Battlefield(BF0),
            },
        )
        .unwrap_err();
    assert_eq!(err, duelbound::ActionError::Stunned);
}

/// Phase advancement is blocked while a window is open.
#[test]
fn test_cannot_advance_during_window() {
    let mut engine = new_duel();
    to_action_phase(&mut engine);
    let p0 = PlayerId::new(0);

    let attacker = spawn_unit(&mut engine, VANGUARD, p0, None, true);
    engine
        .submit(
            p0,
            &Action::StandardMove {
                units: smallvec![attacker],
                to: Destination::Battlefield(BF0),
            },
        )
        .unwrap();
    assert!(engine.state().window.is_open());

    let err = engine.submit(p0, &Action::AdvancePhase).unwrap_err();
    assert_eq!(err, duelbound::ActionError::WindowOpen);
}
