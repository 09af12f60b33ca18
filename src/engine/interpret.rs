//! The ability interpreter: semi-structured card text in, primitive state
//! mutations out.
//!
//! This is a pattern-driven primitive dispatcher, not a parser. Each
//! primitive (draw, channel, gain resources, tokens, keyword grants,
//! stun/ready/buff/kill/banish/return, might adjustment, damage) is
//! detected independently by its own matcher over the normalized word
//! stream; several primitives may fire from one text. Matchers are plain
//! functions over a lowercased word stream, no regex engine involved.
//!
//! Text that matches nothing is never guessed at: the engine records an
//! explicit `UNSUPPORTED effect` diagnostic and applies no effect.
//! Under-automation must be visible, not silently wrong.

use crate::cards::{CardId, CardRegistry, Domain, Keyword};
use crate::core::PlayerId;
use crate::state::{
    BattlefieldId, GameState, InstanceId, Target, TargetRequirement,
};

use super::{primitives, sweep};

/// Resolution context handed to the interpreter.
#[derive(Clone, Copy, Debug)]
pub struct InterpretContext {
    /// Who controls the effect.
    pub controller: PlayerId,
    /// The card whose text is resolving.
    pub source_card: CardId,
    /// The source instance, when the card is in play.
    pub source_instance: Option<InstanceId>,
    /// Battlefield scope for "here" effects.
    pub source_battlefield: Option<BattlefieldId>,
}

/// What interpreting a text did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterpretOutcome {
    /// Number of primitives applied.
    pub applied: usize,
    /// Set when the text matched no known primitive.
    pub unsupported: bool,
}

/// How many declared targets a primitive consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetCount {
    /// Maximum targets.
    pub count: u8,
    /// "up to N": fewer (or none) is a legal no-op.
    pub up_to: bool,
}

/// Friendly/enemy filter for implicit target sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Qualifier {
    Any,
    Friendly,
    Enemy,
}

/// How a primitive picks its units: declared targets, or an implicit
/// mass set ("each enemy unit here").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    Declared(TargetCount),
    All { qualifier: Qualifier, here: bool },
}

/// An atomic effect recognized in ability text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Draw(u32),
    Channel(u32),
    GainEnergy(i32),
    GainPower { domain: Domain, amount: i32 },
    Tokens { count: u32, might: i32, here: bool },
    Grant { keyword: Keyword, this_turn: bool, selector: Selector },
    Stun(Selector),
    ReadyUnits(Selector),
    Kill(Selector),
    Banish(Selector),
    ReturnToHand(Selector),
    BuffMight { amount: i32, this_turn: bool, selector: Selector },
    Damage { amount: i32, selector: Selector, draw_on_kill: Option<u32> },
}

/// Detection result: primitives in text order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Detection {
    /// Recognized primitives, ordered by match position.
    pub primitives: Vec<Primitive>,
    /// True when the text is only keyword restatements ("Tank.") and
    /// deserves no diagnostic.
    pub keyword_only: bool,
}

impl Detection {
    /// True when nothing actionable nor keyword-only was found.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        self.primitives.is_empty() && !self.keyword_only
    }
}

// =============================================================================
// Text scanning
// =============================================================================

fn tokenize(text: &str) -> Vec<String> {
    text.to_ascii_lowercase()
        .split(|c: char| {
            c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':' | '(' | ')' | '"' | '!')
        })
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number(word: &str) -> Option<u32> {
    if let Ok(n) = word.parse::<u32>() {
        return Some(n);
    }
    match word {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "eight" => Some(8),
        "nine" => Some(9),
        "ten" => Some(10),
        _ => None,
    }
}

/// Scan a window for a target count: "up to N ..." or "N units" or an
/// article; defaults to exactly one.
fn parse_target_count(words: &[String]) -> TargetCount {
    let mut i = 0;
    while i < words.len() {
        if words[i] == "up" && words.get(i + 1).map(String::as_str) == Some("to") {
            if let Some(n) = words.get(i + 2).and_then(|w| parse_number(w)) {
                return TargetCount {
                    count: n.min(u32::from(u8::MAX)) as u8,
                    up_to: true,
                };
            }
        }
        if let Some(n) = parse_number(&words[i]) {
            return TargetCount {
                count: n.min(u32::from(u8::MAX)) as u8,
                up_to: false,
            };
        }
        i += 1;
    }
    TargetCount { count: 1, up_to: false }
}

fn parse_qualifier(words: &[String]) -> Qualifier {
    for word in words {
        match word.as_str() {
            "enemy" | "enemies" | "opposing" => return Qualifier::Enemy,
            "friendly" | "your" | "allied" => return Qualifier::Friendly,
            _ => {}
        }
    }
    Qualifier::Any
}

/// Parse the unit-selection phrase following a verb.
fn parse_selector(words: &[String]) -> Selector {
    let mass = words
        .iter()
        .any(|w| matches!(w.as_str(), "each" | "all" | "every"));
    if mass {
        Selector::All {
            qualifier: parse_qualifier(words),
            here: words.iter().any(|w| w == "here"),
        }
    } else {
        Selector::Declared(parse_target_count(words))
    }
}

fn window(words: &[String], start: usize, len: usize) -> &[String] {
    let end = (start + len).min(words.len());
    &words[start.min(end)..end]
}

const GRANT_VERBS: [&str; 8] = [
    "grant", "grants", "give", "gives", "gain", "gains", "get", "gets",
];

fn keyword_at(words: &[String], i: usize) -> Option<Keyword> {
    let word = words.get(i)?;
    let magnitude = words
        .get(i + 1)
        .and_then(|w| parse_number(w))
        .unwrap_or(1)
        .min(u32::from(u8::MAX)) as u8;
    match word.as_str() {
        "tank" => Some(Keyword::Tank),
        "assault" => Some(Keyword::Assault(magnitude)),
        "shield" => Some(Keyword::Shield(magnitude)),
        "legion" => Some(Keyword::Legion),
        "hidden" => Some(Keyword::Hidden),
        "accelerate" => Some(Keyword::Accelerate),
        "deflect" => Some(Keyword::Deflect),
        _ => None,
    }
}

/// Run every matcher over the normalized word stream.
#[must_use]
pub fn detect(text: &str) -> Detection {
    let words = tokenize(text);
    if words.is_empty() {
        return Detection {
            primitives: Vec::new(),
            keyword_only: true,
        };
    }

    let mut found: Vec<(usize, Primitive)> = Vec::new();

    // "if this kills it, draw N" - a conditional rider on a damage
    // primitive, resolved as a before/after existence check.
    let mut conditional: Option<(usize, u32)> = None;
    for i in 0..words.len() {
        if window(&words, i, 4).join(" ") == "if this kills it" {
            if let Some(j) = (i + 4..words.len()).find(|&j| words[j] == "draw") {
                if let Some(n) = words.get(j + 1).and_then(|w| parse_number(w)) {
                    conditional = Some((i, n));
                }
            }
            break;
        }
    }
    let conditional_draw_at = conditional.and_then(|(c, _)| {
        (c..words.len()).find(|&j| words[j] == "draw")
    });

    for i in 0..words.len() {
        let word = words[i].as_str();

        match word {
            "draw" | "draws" if Some(i) != conditional_draw_at => {
                if let Some(n) = words.get(i + 1).and_then(|w| parse_number(w)) {
                    if words.get(i + 2).map_or(false, |w| w.starts_with("card")) {
                        found.push((i, Primitive::Draw(n)));
                    }
                }
            }
            "channel" | "channels" => {
                if let Some(n) = words.get(i + 1).and_then(|w| parse_number(w)) {
                    if words.get(i + 2).map_or(false, |w| w.starts_with("rune")) {
                        found.push((i, Primitive::Channel(n)));
                    }
                }
            }
            "energy" => {
                if let Some(n) = i.checked_sub(1).and_then(|j| parse_number(&words[j])) {
                    let verb = i >= 2 && GRANT_VERBS.contains(&words[i - 2].as_str());
                    if verb {
                        found.push((i, Primitive::GainEnergy(n as i32)));
                    }
                }
            }
            "power" => {
                // "gain 2 fury power"
                if let Some(domain) =
                    i.checked_sub(1).and_then(|j| Domain::from_name(&words[j]))
                {
                    if let Some(n) = i.checked_sub(2).and_then(|j| parse_number(&words[j])) {
                        found.push((
                            i,
                            Primitive::GainPower {
                                domain,
                                amount: n as i32,
                            },
                        ));
                    }
                }
            }
            "token" | "tokens" => {
                // "... 2 might-1 tokens ..."
                if let Some(might) = i.checked_sub(1).and_then(|j| {
                    words[j]
                        .strip_prefix("might-")
                        .and_then(|m| m.parse::<i32>().ok())
                }) {
                    let count = i
                        .checked_sub(2)
                        .and_then(|j| parse_number(&words[j]))
                        .unwrap_or(1);
                    let here = window(&words, i + 1, 2).iter().any(|w| w == "here");
                    found.push((i, Primitive::Tokens { count, might, here }));
                }
            }
            "stun" | "stuns" => {
                found.push((i, Primitive::Stun(parse_selector(window(&words, i + 1, 6)))));
            }
            "ready" => {
                if window(&words, i + 1, 6).iter().any(|w| w.starts_with("unit")) {
                    found.push((
                        i,
                        Primitive::ReadyUnits(parse_selector(window(&words, i + 1, 6))),
                    ));
                }
            }
            "kill" | "destroy" => {
                found.push((i, Primitive::Kill(parse_selector(window(&words, i + 1, 6)))));
            }
            "banish" => {
                found.push((
                    i,
                    Primitive::Banish(parse_selector(window(&words, i + 1, 6))),
                ));
            }
            "return" => {
                if window(&words, i + 1, 8).iter().any(|w| w == "hand") {
                    found.push((
                        i,
                        Primitive::ReturnToHand(parse_selector(window(&words, i + 1, 6))),
                    ));
                }
            }
            "deal" | "deals" => {
                if let Some(n) = words.get(i + 1).and_then(|w| parse_number(w)) {
                    if words.get(i + 2).map(String::as_str) == Some("damage") {
                        let phrase = window(&words, i + 3, 8);
                        found.push((
                            i,
                            Primitive::Damage {
                                amount: n as i32,
                                selector: parse_selector(phrase),
                                draw_on_kill: None,
                            },
                        ));
                    }
                }
            }
            "might" => {
                // "+2 might" / "-1 might", optionally "this turn".
                if let Some(amount) = i
                    .checked_sub(1)
                    .and_then(|j| words[j].parse::<i32>().ok())
                    .filter(|_| {
                        words[i - 1].starts_with('+') || words[i - 1].starts_with('-')
                    })
                {
                    let this_turn = window(&words, i + 1, 3).join(" ").contains("this turn");
                    let before_start = i.saturating_sub(6);
                    let selector = parse_selector(&words[before_start..i - 1]);
                    found.push((
                        i,
                        Primitive::BuffMight {
                            amount,
                            this_turn,
                            selector,
                        },
                    ));
                }
            }
            _ => {
                // Keyword grants: "gains Assault 2 this turn".
                if let Some(keyword) = keyword_at(&words, i) {
                    let verb_before = window(&words, i.saturating_sub(4), 4.min(i))
                        .iter()
                        .any(|w| GRANT_VERBS.contains(&w.as_str()));
                    if verb_before {
                        let this_turn =
                            window(&words, i + 1, 4).join(" ").contains("this turn");
                        let phrase_start = i.saturating_sub(6);
                        let selector = parse_selector(&words[phrase_start..i]);
                        found.push((
                            i,
                            Primitive::Grant {
                                keyword,
                                this_turn,
                                selector,
                            },
                        ));
                    }
                }
            }
        }
    }

    // Attach the conditional rider to the nearest preceding damage.
    if let Some((cond_idx, draw_n)) = conditional {
        if let Some((_, Primitive::Damage { draw_on_kill, .. })) = found
            .iter_mut()
            .filter(|(i, p)| *i < cond_idx && matches!(p, Primitive::Damage { .. }))
            .last()
        {
            *draw_on_kill = Some(draw_n);
        }
    }

    found.sort_by_key(|(i, _)| *i);
    let primitives: Vec<Primitive> = found.into_iter().map(|(_, p)| p).collect();

    let keyword_only = primitives.is_empty()
        && words.iter().all(|w| {
            keyword_at(std::slice::from_ref(w), 0).is_some()
                || parse_number(w).is_some()
                || matches!(w.as_str(), "this" | "turn")
        });

    Detection {
        primitives,
        keyword_only,
    }
}

/// Pre-scan a text for how many declared targets it wants.
#[must_use]
pub fn required_targets(text: &str) -> TargetRequirement {
    let detection = detect(text);
    let mut max_count = 0u8;
    let mut any_up_to = false;

    for primitive in &detection.primitives {
        let selector = match primitive {
            Primitive::Grant { selector, .. }
            | Primitive::Stun(selector)
            | Primitive::ReadyUnits(selector)
            | Primitive::Kill(selector)
            | Primitive::Banish(selector)
            | Primitive::ReturnToHand(selector)
            | Primitive::BuffMight { selector, .. }
            | Primitive::Damage { selector, .. } => selector,
            _ => continue,
        };
        if let Selector::Declared(count) = selector {
            max_count = max_count.max(count.count);
            any_up_to |= count.up_to;
        }
    }

    if max_count == 0 {
        TargetRequirement::None
    } else {
        TargetRequirement::Units {
            count: max_count,
            up_to: any_up_to,
        }
    }
}

// =============================================================================
// Application
// =============================================================================

/// Re-validate declared unit targets: the instance must still be exactly
/// where it was when declared.
fn validated_units(state: &GameState, targets: &[Target], cap: usize) -> Vec<InstanceId> {
    targets
        .iter()
        .filter_map(Target::as_unit)
        .filter(|r| state.find_unit(r.instance) == Some((r.owner, r.zone)))
        .map(|r| r.instance)
        .take(cap)
        .collect()
}

/// Build the implicit set for a mass effect.
fn implicit_units(
    state: &GameState,
    ctx: &InterpretContext,
    qualifier: Qualifier,
    here: bool,
) -> Vec<InstanceId> {
    let controllers: Vec<PlayerId> = match qualifier {
        Qualifier::Any => PlayerId::both().collect(),
        Qualifier::Friendly => vec![ctx.controller],
        Qualifier::Enemy => vec![ctx.controller.opponent()],
    };

    let mut units = Vec::new();
    for controller in controllers {
        match (here, ctx.source_battlefield) {
            (true, Some(bf)) => {
                units.extend(state.battlefield(bf).units[controller].iter().copied());
            }
            _ => units.extend(state.units_in_play(controller)),
        }
    }
    units
}

fn select_units(
    state: &GameState,
    ctx: &InterpretContext,
    selector: Selector,
    declared: &[Target],
) -> Vec<InstanceId> {
    match selector {
        Selector::Declared(count) => validated_units(state, declared, count.count as usize),
        Selector::All { qualifier, here } => implicit_units(state, ctx, qualifier, here),
    }
}

/// Interpret a normalized ability text and apply its primitives.
///
/// Unmatched text is an explicit no-op: an `UNSUPPORTED effect` line goes
/// to the game log and the outcome reports the gap.
pub fn interpret(
    registry: &CardRegistry,
    state: &mut GameState,
    text: &str,
    declared: &[Target],
    ctx: &InterpretContext,
) -> InterpretOutcome {
    let detection = detect(text);

    if detection.is_unsupported() {
        tracing::warn!(card = %ctx.source_card, text, "unsupported ability text");
        state.log_event(format!("UNSUPPORTED effect: {text}"));
        return InterpretOutcome {
            applied: 0,
            unsupported: true,
        };
    }

    let mut outcome = InterpretOutcome::default();
    for primitive in detection.primitives {
        if state.is_over() {
            break;
        }
        apply_primitive(registry, state, primitive, declared, ctx);
        outcome.applied += 1;
    }
    outcome
}

fn apply_primitive(
    registry: &CardRegistry,
    state: &mut GameState,
    primitive: Primitive,
    declared: &[Target],
    ctx: &InterpretContext,
) {
    match primitive {
        Primitive::Draw(n) => primitives::draw_cards(state, ctx.controller, n),

        Primitive::Channel(n) => primitives::channel_runes(state, ctx.controller, n),

        Primitive::GainEnergy(n) => {
            state.players[ctx.controller].pool.add_energy(n);
        }

        Primitive::GainPower { domain, amount } => {
            state.players[ctx.controller].pool.add_power(domain, amount);
        }

        Primitive::Tokens { count, might, here } => {
            let location = if here { ctx.source_battlefield } else { None };
            for _ in 0..count {
                primitives::create_token(state, ctx.controller, might, location);
            }
        }

        Primitive::Grant {
            keyword,
            this_turn,
            selector,
        } => {
            for unit in select_units(state, ctx, selector, declared) {
                if let Some(card) = state.card_mut(unit) {
                    if this_turn {
                        card.granted_this_turn.push(keyword);
                    } else {
                        card.granted.push(keyword);
                    }
                }
            }
        }

        Primitive::Stun(selector) => {
            for unit in select_units(state, ctx, selector, declared) {
                if let Some(card) = state.card_mut(unit) {
                    card.stunned = true;
                }
            }
        }

        Primitive::ReadyUnits(selector) => {
            for unit in select_units(state, ctx, selector, declared) {
                if let Some(card) = state.card_mut(unit) {
                    card.ready_up();
                }
            }
        }

        Primitive::Kill(selector) => {
            for unit in select_units(state, ctx, selector, declared) {
                primitives::kill_unit(state, unit);
            }
        }

        Primitive::Banish(selector) => {
            for unit in select_units(state, ctx, selector, declared) {
                primitives::banish_unit(state, unit);
            }
        }

        Primitive::ReturnToHand(selector) => {
            for unit in select_units(state, ctx, selector, declared) {
                primitives::return_to_hand(state, unit);
            }
        }

        Primitive::BuffMight {
            amount,
            this_turn,
            selector,
        } => {
            for unit in select_units(state, ctx, selector, declared) {
                if let Some(card) = state.card_mut(unit) {
                    if this_turn {
                        card.turn_bonus += amount;
                    } else {
                        card.buff += amount;
                    }
                }
            }
        }

        Primitive::Damage {
            amount,
            selector,
            draw_on_kill,
        } => {
            let struck = select_units(state, ctx, selector, declared);
            for &unit in &struck {
                if let Some(card) = state.card_mut(unit) {
                    card.damage += amount;
                }
            }

            if let Some(draw_n) = draw_on_kill {
                if !struck.is_empty() {
                    // Before/after existence check on the recorded targets.
                    sweep::run(registry, state);
                    let all_dead = struck.iter().all(|&u| state.find_unit(u).is_none());
                    if all_dead {
                        primitives::draw_cards(state, ctx.controller, draw_n);
                    }
                }
            }
        }
    }
}
