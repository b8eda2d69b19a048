//! A module for defining AI behaviors for battle agents.

use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{DamageFormula, ModifiableStat, MoveEffect, PokemonType, SecondaryEffect, Status, Target};
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

use crate::battle::commands::PlayerSide;
use crate::battle::conditions::{MAX_STAGE, MIN_STAGE};
use crate::battle::engine::resolve_move;
use crate::battle::state::BattleState;
use crate::battle::stats::modified_stat;
use crate::player::{BattlePlayer, PlayerAction};

/// A trait for any system that can decide on a battle action.
///
/// `legal` is never empty, and the returned action must be one of its
/// entries; the battle treats anything else as a broken agent and panics.
pub trait Behavior: Send {
    /// Picks an action for a general request (moves and switches).
    fn choose_action(&mut self, state: &BattleState, side: PlayerSide, legal: &[PlayerAction]) -> PlayerAction;

    /// Picks a replacement after the active pokemon fainted; `legal` only
    /// holds switches.
    fn choose_replacement(
        &mut self,
        state: &BattleState,
        side: PlayerSide,
        legal: &[PlayerAction],
    ) -> PlayerAction {
        self.choose_action(state, side, legal)
    }
}

/// Picks uniformly among the legal actions.
pub struct RandomAI {
    rng: StdRng,
}

impl RandomAI {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Behavior for RandomAI {
    fn choose_action(&mut self, _state: &BattleState, _side: PlayerSide, legal: &[PlayerAction]) -> PlayerAction {
        legal[self.rng.random_range(0..legal.len())]
    }
}

/// Greedy heuristic agent: scores every legal action and takes the best.
pub struct ScoringAI {
    rng: StdRng,
}

impl ScoringAI {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// The core scoring logic. Assigns a floating-point value to a given action.
    fn score_action(&mut self, action: &PlayerAction, side: PlayerSide, state: &BattleState) -> f64 {
        let score = match action {
            PlayerAction::UseMove { move_index } => score_move(*move_index, side, state),
            // A small, positive baseline: better than a useless move, worse than any decent attack.
            PlayerAction::SwitchPokemon { .. } => 1.0,
        };
        // Jitter breaks ties and keeps the agent out of repetitive loops.
        score * (1.0 + self.rng.random_range(-0.05..0.05))
    }
}

fn score_move(move_index: usize, side: PlayerSide, state: &BattleState) -> f64 {
    let player = state.player(side);
    let opponent = state.player(side.opponent());
    let attacker = player.active_pokemon();
    let defender = opponent.active_pokemon();
    let move_ = resolve_move(state, side, move_index);
    let effect = move_.effect();

    // --- Step 1: Calculate the Core Damage Score ---
    let mut damage_score = 0.0;
    if let Some(formula) = effect.damage_formula() {
        let effectiveness = defender.species().attack_effectiveness(move_.move_type());
        // If the opponent is immune, this is a terrible move.
        if effectiveness == 0.0 {
            return -1.0;
        }

        let base_power = match formula {
            DamageFormula::Standard { power } | DamageFormula::HighCritical { power } => *power as f64,
            DamageFormula::Constant(amount) => *amount as f64,
            DamageFormula::Level | DamageFormula::Psywave => attacker.level() as f64,
            DamageFormula::SuperFang => (defender.current_hp() / 2) as f64,
            DamageFormula::OneHitKo => defender.current_hp() as f64 * 0.3,
        };

        if formula.uses_standard_math() {
            let stab = if attacker.species().has_type(move_.move_type()) { 1.5 } else { 1.0 };
            let offense = if move_.is_physical() { ModifiableStat::Attack } else { ModifiableStat::Special };
            let normalized_power = modified_stat(player, offense) / (attacker.level() as f64 * 2.0).max(1.0);
            damage_score = base_power * effectiveness * stab * normalized_power;
        } else {
            damage_score = base_power;
        }
    }

    // --- Step 2: Calculate the Utility Score ---
    let utility_score = utility(effect, player, opponent);

    // --- Step 3: Combine Scores and Apply Final Modifiers ---
    let mut final_score = damage_score + utility_score;

    if !effect.is_damaging() {
        // Don't use a status move that cannot do anything right now.
        if utility_score < 1.0 {
            return -1.0;
        }
    } else {
        // Give a slight edge to sure-hit moves.
        let accuracy = move_.accuracy().map_or(1.01, |a| a as f64 / 255.0);
        final_score *= accuracy;
    }
    final_score
}

fn utility(effect: &MoveEffect, player: &BattlePlayer, opponent: &BattlePlayer) -> f64 {
    let defender = opponent.active_pokemon();
    let status_value = |status: &Status| {
        if defender.status().is_none() && !status.is_none() {
            45.0
        } else {
            0.0
        }
    };

    match effect {
        // Self-buffs are valuable if the stat isn't maxed out.
        MoveEffect::StatModify { stat, stages, target: Target::User } => {
            let current = player.active.stat_stage(*stat);
            if current < MAX_STAGE {
                20.0 * *stages as f64 * (1.0 - current as f64 / MAX_STAGE as f64)
            } else {
                0.0
            }
        }
        // Opponent debuffs are valuable if the stat isn't minimized.
        MoveEffect::StatModify { stat, stages, target: Target::Target } => {
            if opponent.active.stat_stage(*stat) > MIN_STAGE && !opponent.active.has_mist() {
                15.0 * *stages as f64
            } else {
                0.0
            }
        }
        MoveEffect::StatusInflict(status) => status_value(status),
        MoveEffect::Toxic => status_value(&Status::Poison),
        MoveEffect::Confuse if !opponent.active.is_confused() => 30.0,
        MoveEffect::LeechSeed
            if !opponent.active.is_seeded() && !defender.species().has_type(PokemonType::Grass) =>
        {
            40.0
        }
        MoveEffect::Mist if !player.active.has_mist() => 10.0,
        MoveEffect::FocusEnergy if !player.active.has_focus_energy() => 10.0,
        MoveEffect::Reflect if !player.active.has_reflect() => 25.0,
        MoveEffect::LightScreen if !player.active.has_light_screen() => 25.0,
        MoveEffect::SideEffect { chance, inner, extra } => {
            let odds = *chance as f64 / 100.0;
            let extra_value = match extra {
                SecondaryEffect::Status(status) => status_value(status),
                SecondaryEffect::Flinch => 30.0,
                SecondaryEffect::Confuse => 30.0,
                SecondaryEffect::LowerStat { stages, .. } => 15.0 * *stages as f64,
            };
            odds * extra_value + utility(inner, player, opponent)
        }
        _ => 0.0,
    }
}

impl Behavior for ScoringAI {
    fn choose_action(&mut self, state: &BattleState, side: PlayerSide, legal: &[PlayerAction]) -> PlayerAction {
        let scored: Vec<(PlayerAction, f64)> = legal
            .iter()
            .map(|action| (*action, self.score_action(action, side, state)))
            .collect();
        scored
            .into_iter()
            .max_by_key(|(_, score)| OrderedFloat(*score))
            .map(|(action, _)| action)
            .unwrap_or(legal[0])
    }
}

// --- Ranking agents ---

/// Features per side: HP fraction, six stat stages, six-way status one-hot.
pub const SIDE_FEATURES: usize = 1 + ModifiableStat::COUNT + 6;
pub const FEATURE_COUNT: usize = 2 * SIDE_FEATURES;

/// The ten fixed output positions of a ranking agent.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSlot {
    Move1,
    Move2,
    Move3,
    Move4,
    Switch1,
    Switch2,
    Switch3,
    Switch4,
    Switch5,
    Switch6,
}

impl ActionSlot {
    pub const COUNT: usize = 10;

    pub const ALL: [ActionSlot; ActionSlot::COUNT] = [
        ActionSlot::Move1,
        ActionSlot::Move2,
        ActionSlot::Move3,
        ActionSlot::Move4,
        ActionSlot::Switch1,
        ActionSlot::Switch2,
        ActionSlot::Switch3,
        ActionSlot::Switch4,
        ActionSlot::Switch5,
        ActionSlot::Switch6,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_action(action: PlayerAction) -> Option<Self> {
        let index = match action {
            PlayerAction::UseMove { move_index } if move_index < 4 => move_index,
            PlayerAction::SwitchPokemon { team_index } if team_index < 6 => 4 + team_index,
            _ => return None,
        };
        Some(Self::ALL[index])
    }

    pub fn to_action(self) -> PlayerAction {
        let index = self.index();
        if index < 4 {
            PlayerAction::UseMove { move_index: index }
        } else {
            PlayerAction::SwitchPokemon { team_index: index - 4 }
        }
    }
}

fn encode_side(player: &BattlePlayer, out: &mut [f64]) {
    let pokemon = player.active_pokemon();
    out[0] = pokemon.current_hp() as f64 / pokemon.max_hp().max(1) as f64;
    for (i, stage) in player.active.stat_stages().iter().enumerate() {
        out[1 + i] = *stage as f64 / MAX_STAGE as f64;
    }
    let status_offset = 1 + ModifiableStat::COUNT;
    for (i, status) in Status::iter().enumerate() {
        out[status_offset + i] = if pokemon.status() == status { 1.0 } else { 0.0 };
    }
}

/// Flattens the battle, as seen from `side`, into a feature vector: the
/// acting side's active pokemon first, then the opponent's.
pub fn encode_battle(state: &BattleState, side: PlayerSide) -> [f64; FEATURE_COUNT] {
    let mut features = [0.0; FEATURE_COUNT];
    let (own, theirs) = features.split_at_mut(SIDE_FEATURES);
    encode_side(state.player(side), own);
    encode_side(state.player(side.opponent()), theirs);
    features
}

/// Scores every action slot from an encoded battle; higher is better.
pub trait ActionRanker: Send {
    fn rank(&self, features: &[f64; FEATURE_COUNT]) -> [f64; ActionSlot::COUNT];
}

/// Plays the highest-ranked legal slot.
pub struct RankingAI<R: ActionRanker> {
    ranker: R,
}

impl<R: ActionRanker> RankingAI<R> {
    pub fn new(ranker: R) -> Self {
        Self { ranker }
    }

    pub fn ranker(&self) -> &R {
        &self.ranker
    }
}

impl<R: ActionRanker> Behavior for RankingAI<R> {
    fn choose_action(&mut self, state: &BattleState, side: PlayerSide, legal: &[PlayerAction]) -> PlayerAction {
        let scores = self.ranker.rank(&encode_battle(state, side));
        legal
            .iter()
            .copied()
            .max_by_key(|action| {
                let score = ActionSlot::from_action(*action).map_or(f64::NEG_INFINITY, |slot| scores[slot.index()]);
                OrderedFloat(score)
            })
            .unwrap_or(legal[0])
    }
}

/// A single dense layer from features to action slots.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinearRanker {
    pub weights: [[f64; FEATURE_COUNT]; ActionSlot::COUNT],
    pub bias: [f64; ActionSlot::COUNT],
}

impl LinearRanker {
    pub fn zeros() -> Self {
        Self { weights: [[0.0; FEATURE_COUNT]; ActionSlot::COUNT], bias: [0.0; ActionSlot::COUNT] }
    }

    /// Weights and bias drawn uniformly from [-1, 1).
    pub fn random(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ranker = Self::zeros();
        for row in ranker.weights.iter_mut() {
            for weight in row.iter_mut() {
                *weight = rng.random_range(-1.0..1.0);
            }
        }
        for bias in ranker.bias.iter_mut() {
            *bias = rng.random_range(-1.0..1.0);
        }
        ranker
    }
}

impl ActionRanker for LinearRanker {
    fn rank(&self, features: &[f64; FEATURE_COUNT]) -> [f64; ActionSlot::COUNT] {
        let mut scores = self.bias;
        for (score, row) in scores.iter_mut().zip(self.weights.iter()) {
            *score += row.iter().zip(features.iter()).map(|(w, x)| w * x).sum::<f64>();
        }
        scores
    }
}
