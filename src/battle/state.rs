use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{ModifiableStat, Status};
use serde::{Deserialize, Serialize};

use crate::battle::commands::PlayerSide;
use crate::battle::conditions::VolatileCondition;
use crate::player::BattlePlayer;
use crate::pokemon::PartyPokemon;
use crate::ruleset::Ruleset;

/// Terminal result of a battle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Player1Win,
    Player2Win,
    Draw,
}

impl BattleOutcome {
    pub fn winner(self) -> Option<PlayerSide> {
        match self {
            BattleOutcome::Player1Win => Some(PlayerSide::Player1),
            BattleOutcome::Player2Win => Some(PlayerSide::Player2),
            BattleOutcome::Draw => None,
        }
    }

    pub fn win_for(side: PlayerSide) -> Self {
        match side {
            PlayerSide::Player1 => BattleOutcome::Player1Win,
            PlayerSide::Player2 => BattleOutcome::Player2Win,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },

    // Pokemon Actions
    PokemonSwitched {
        side: PlayerSide,
        old_pokemon: String,
        new_pokemon: String,
    },
    MoveUsed {
        side: PlayerSide,
        pokemon: String,
        move_name: String,
    },
    MoveMissed {
        attacker: String,
    },
    MoveFailed {
        pokemon: String,
    },
    NothingHappened,
    CriticalHit,
    HitCount {
        hits: u8,
    },
    AttackTypeEffectiveness {
        multiplier: f64,
    },

    // Damage and Healing
    DamageDealt {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    PokemonHealed {
        target: String,
        amount: u16,
        new_hp: u16,
    },
    PokemonFainted {
        side: PlayerSide,
        pokemon: String,
    },
    RecoilDamage {
        pokemon: String,
    },
    HurtItself {
        pokemon: String,
    },
    LeechSeedDrain {
        pokemon: String,
    },

    // Status Conditions
    StatusApplied {
        target: String,
        status: Status,
    },
    StatusRemoved {
        target: String,
        status: Status,
    },
    StatusDamage {
        target: String,
        status: Status,
    },
    ConditionApplied {
        target: String,
        condition: VolatileCondition,
    },
    Confused {
        target: String,
    },
    ConfusionEnded {
        target: String,
    },

    // Stat Changes
    StatStageChanged {
        target: String,
        stat: ModifiableStat,
        delta: i8,
    },
    StatChangeBlocked {
        target: String,
        stat: ModifiableStat,
        rising: bool,
    },
    ProtectedByMist {
        target: String,
    },

    // Action Failures
    ActionFailed {
        pokemon: String,
        reason: ActionFailureReason,
    },

    // Battle End
    PlayerDefeated {
        side: PlayerSide,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFailureReason {
    IsFlinching,
    IsAsleep,
    WokeUp,
    IsParalyzed,
    IsFrozen,
    IsConfused,
}

impl BattleEvent {
    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, battle_state: &BattleState) -> Option<String> {
        match self {
            BattleEvent::TurnStarted { turn_number } => Some(format!("=== Turn {} ===", turn_number)),

            BattleEvent::PokemonSwitched { side, old_pokemon, new_pokemon } => {
                let player_name = &battle_state.player(*side).player_name;
                Some(format!(
                    "{} recalled {} and sent out {}!",
                    player_name, old_pokemon, new_pokemon
                ))
            }

            BattleEvent::MoveUsed { side, pokemon, move_name } => {
                let player_name = &battle_state.player(*side).player_name;
                Some(format!("{}'s {} used {}!", player_name, pokemon, move_name))
            }
            BattleEvent::MoveMissed { attacker } => Some(format!("{}'s attack missed!", attacker)),
            BattleEvent::MoveFailed { .. } => Some("But it failed!".to_string()),
            BattleEvent::NothingHappened => Some("But nothing happened!".to_string()),
            BattleEvent::CriticalHit => Some("A critical hit!".to_string()),
            BattleEvent::HitCount { hits } => Some(format!("Hit {} time(s)!", hits)),
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m < 1.0 && m > 0.0 => Some("It's not very effective...".to_string()),
                m if m == 0.0 => Some("It had no effect!".to_string()),
                _ => None,
            },

            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", target, damage))
            }
            BattleEvent::PokemonHealed { target, amount, .. } => {
                Some(format!("{} recovered {} HP!", target, amount))
            }
            BattleEvent::PokemonFainted { pokemon, .. } => Some(format!("{} fainted!", pokemon)),
            BattleEvent::RecoilDamage { pokemon } => Some(format!("{} is hit with recoil!", pokemon)),
            BattleEvent::HurtItself { pokemon } => {
                Some(format!("{} hurt itself in its confusion!", pokemon))
            }
            BattleEvent::LeechSeedDrain { pokemon } => {
                Some(format!("{}'s health is sapped by leech seed!", pokemon))
            }

            BattleEvent::StatusApplied { target, status } => {
                Some(format!("{} {}", target, Self::format_status_applied(*status)))
            }
            BattleEvent::StatusRemoved { target, status } => {
                Some(format!("{} {}", target, Self::format_status_removed(*status)))
            }
            BattleEvent::StatusDamage { target, status } => Some(format!(
                "{} is hurt by its {}!",
                target,
                Self::format_status(*status)
            )),
            BattleEvent::ConditionApplied { target, condition } => match condition {
                VolatileCondition::LeechSeed => Some(format!("{} was seeded!", target)),
                VolatileCondition::Mist => Some(format!("{} is shrouded in mist!", target)),
                VolatileCondition::Reflect | VolatileCondition::LightScreen => {
                    Some(format!("{} is protected by {}!", target, condition))
                }
                VolatileCondition::FocusEnergy => Some(format!("{} is getting pumped!", target)),
                VolatileCondition::Flinched => None,
            },
            BattleEvent::Confused { target } => Some(format!("{} became confused!", target)),
            BattleEvent::ConfusionEnded { target } => {
                Some(format!("{} snapped out of confusion!", target))
            }

            BattleEvent::StatStageChanged { target, stat, delta } => {
                let verb = match *delta {
                    d if d >= 2 => "greatly rose",
                    d if d > 0 => "rose",
                    d if d <= -2 => "greatly fell",
                    _ => "fell",
                };
                Some(format!("{}'s {} {}!", target, stat, verb))
            }
            BattleEvent::StatChangeBlocked { target, rising, .. } => {
                let direction = if *rising { "higher" } else { "lower" };
                Some(format!("{}'s stats won't go any {}!", target, direction))
            }
            BattleEvent::ProtectedByMist { target } => {
                Some(format!("{} is protected by the mist!", target))
            }

            BattleEvent::ActionFailed { pokemon, reason } => Some(format!(
                "{} {}",
                pokemon,
                Self::format_action_failure_reason(*reason)
            )),

            BattleEvent::PlayerDefeated { side } => {
                let player_name = &battle_state.player(*side).player_name;
                Some(format!("{} is out of usable Pokémon!", player_name))
            }
            BattleEvent::BattleEnded { outcome } => match outcome.winner() {
                Some(side) => Some(format!(
                    "{} has won the battle!",
                    battle_state.player(side).player_name
                )),
                None => Some("The battle ended in a draw!".to_string()),
            },
        }
    }

    // --- Private Helper Functions ---

    fn format_status(status: Status) -> &'static str {
        match status {
            Status::None => "nothing",
            Status::Sleep => "sleep",
            Status::Poison => "poison",
            Status::Burn => "burn",
            Status::Freeze => "freeze",
            Status::Paralysis => "paralysis",
        }
    }

    fn format_status_applied(status: Status) -> String {
        match status {
            Status::Sleep => "fell asleep!".to_string(),
            Status::Poison => "was poisoned!".to_string(),
            Status::Burn => "was burned!".to_string(),
            Status::Freeze => "was frozen solid!".to_string(),
            Status::Paralysis => "is paralyzed! It may be unable to move!".to_string(),
            Status::None => "is unaffected.".to_string(),
        }
    }

    fn format_status_removed(status: Status) -> String {
        match status {
            Status::Sleep => "woke up!".to_string(),
            Status::Freeze => "thawed out!".to_string(),
            _ => format!("was cured of its {}!", Self::format_status(status)),
        }
    }

    fn format_action_failure_reason(reason: ActionFailureReason) -> &'static str {
        match reason {
            ActionFailureReason::IsFlinching => "flinched and couldn't move!",
            ActionFailureReason::IsAsleep => "is fast asleep.",
            ActionFailureReason::WokeUp => "woke up!",
            ActionFailureReason::IsParalyzed => "is fully paralyzed!",
            ActionFailureReason::IsFrozen => "is frozen solid!",
            ActionFailureReason::IsConfused => "is confused!",
        }
    }
}

/// Battle events grouped by turn. Events recorded before the first turn
/// starts land in their own leading group.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BattleLog {
    turns: Vec<Vec<BattleEvent>>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_turn(&mut self) {
        self.turns.push(Vec::new());
    }

    pub fn push(&mut self, event: BattleEvent) {
        match self.turns.last_mut() {
            Some(turn) => turn.push(event),
            None => self.turns.push(vec![event]),
        }
    }

    pub fn turns(&self) -> &[Vec<BattleEvent>] {
        &self.turns
    }

    /// Events of the most recent turn.
    pub fn last_turn(&self) -> &[BattleEvent] {
        self.turns.last().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn events(&self) -> impl Iterator<Item = &BattleEvent> {
        self.turns.iter().flatten()
    }

    /// Return true if the log contains no events.
    pub fn is_empty(&self) -> bool {
        self.turns.iter().all(Vec::is_empty)
    }

    /// Return the number of events in the log.
    pub fn len(&self) -> usize {
        self.turns.iter().map(Vec::len).sum()
    }
}

enum RngSource {
    Seeded(StdRng),
    Scripted { outcomes: Vec<u32>, index: usize },
}

impl std::fmt::Debug for RngSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RngSource::Seeded(_) => write!(f, "Seeded"),
            RngSource::Scripted { outcomes, index } => {
                write!(f, "Scripted({}/{})", index, outcomes.len())
            }
        }
    }
}

/// The single source of randomness for one battle. Every draw carries a
/// reason string that shows up in trace logs and in scripted-mode panics.
#[derive(Debug)]
pub struct BattleRng {
    source: RngSource,
}

impl BattleRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { source: RngSource::Seeded(StdRng::seed_from_u64(seed)) }
    }

    pub fn from_entropy() -> Self {
        Self { source: RngSource::Seeded(StdRng::from_os_rng()) }
    }

    /// Replays `outcomes` in order. Each value must lie in the range of the
    /// draw that consumes it.
    pub fn new_for_test(outcomes: Vec<u32>) -> Self {
        Self { source: RngSource::Scripted { outcomes, index: 0 } }
    }

    /// Uniform integer in `[low, high)`.
    pub fn range(&mut self, low: u32, high: u32, reason: &str) -> u32 {
        assert!(low < high, "empty range {}..{} for '{}'", low, high, reason);
        let value = match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(low..high),
            RngSource::Scripted { outcomes, index } => {
                let Some(&value) = outcomes.get(*index) else {
                    panic!(
                        "BattleRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                };
                assert!(
                    (low..high).contains(&value),
                    "scripted value {} for '{}' is outside {}..{}",
                    value,
                    reason,
                    low,
                    high
                );
                *index += 1;
                value
            }
        };
        tracing::trace!(value, low, high, reason, "rng draw");
        value
    }

    /// True with `percent` percent probability.
    pub fn chance(&mut self, percent: u8, reason: &str) -> bool {
        self.range(0, 100, reason) < percent as u32
    }

    pub fn coin_flip(&mut self, reason: &str) -> bool {
        self.range(0, 2, reason) == 0
    }

    /// Picks a value with probability proportional to its weight.
    pub fn weighted<T: Copy>(&mut self, choices: &[(T, u32)], reason: &str) -> T {
        let total: u32 = choices.iter().map(|(_, weight)| weight).sum();
        let mut roll = self.range(0, total, reason);
        for &(value, weight) in choices {
            if roll < weight {
                return value;
            }
            roll -= weight;
        }
        unreachable!("roll is always below the total weight")
    }

    /// Scripted values left to consume; `None` for a seeded source.
    pub fn remaining(&self) -> Option<usize> {
        match &self.source {
            RngSource::Seeded(_) => None,
            RngSource::Scripted { outcomes, index } => Some(outcomes.len() - index),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BattleState {
    pub players: [BattlePlayer; 2],
    /// Turns started so far.
    pub turn_number: u32,
    pub outcome: Option<BattleOutcome>,
    pub ruleset: Arc<Ruleset>,
    pub log: BattleLog,
}

impl BattleState {
    pub fn new(
        player1: BattlePlayer,
        player2: BattlePlayer,
        ruleset: Arc<Ruleset>,
    ) -> Self {
        Self {
            players: [player1, player2],
            turn_number: 0,
            outcome: None,
            ruleset,
            log: BattleLog::new(),
        }
    }

    /// Builds both sides from roster entries; the caller validates the teams.
    pub fn from_teams(
        team1: &[Arc<PartyPokemon>],
        team2: &[Arc<PartyPokemon>],
        ruleset: Arc<Ruleset>,
    ) -> Self {
        Self::new(
            BattlePlayer::new("Player 1", team1),
            BattlePlayer::new("Player 2", team2),
            ruleset,
        )
    }

    pub fn player(&self, side: PlayerSide) -> &BattlePlayer {
        &self.players[side.to_index()]
    }

    pub fn player_mut(&mut self, side: PlayerSide) -> &mut BattlePlayer {
        &mut self.players[side.to_index()]
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// The per-turn text log.
    pub fn text_log(&self) -> Vec<Vec<String>> {
        self.log
            .turns()
            .iter()
            .map(|turn| turn.iter().filter_map(|event| event.format(self)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scripted_rng_replays_values() {
        let mut rng = BattleRng::new_for_test(vec![3, 0, 1, 7]);
        assert_eq!(rng.range(0, 10, "first"), 3);
        assert!(rng.coin_flip("coin"));
        assert!(!rng.coin_flip("coin"));
        assert_eq!(rng.weighted(&[(2u8, 3), (3, 3), (4, 1), (5, 1)], "hits"), 5);
        assert_eq!(rng.remaining(), Some(0));
    }

    #[test]
    #[should_panic(expected = "BattleRng exhausted")]
    fn test_scripted_rng_panics_when_exhausted() {
        let mut rng = BattleRng::new_for_test(vec![]);
        rng.chance(50, "empty");
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_scripted_rng_rejects_out_of_range_values() {
        let mut rng = BattleRng::new_for_test(vec![300]);
        rng.range(0, 256, "crit roll");
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = BattleRng::from_seed(42);
        let mut b = BattleRng::from_seed(42);
        let draws_a: Vec<u32> = (0..20).map(|_| a.range(217, 256, "damage roll")).collect();
        let draws_b: Vec<u32> = (0..20).map(|_| b.range(217, 256, "damage roll")).collect();
        assert_eq!(draws_a, draws_b);
        assert!(draws_a.iter().all(|v| (217..256).contains(v)));
    }

    #[test]
    fn test_weighted_boundaries() {
        let choices = [(2u8, 3), (3, 3), (4, 1), (5, 1)];
        let mut rng = BattleRng::new_for_test(vec![0, 2, 3, 5, 6]);
        let hits: Vec<u8> = (0..5).map(|_| rng.weighted(&choices, "hits")).collect();
        assert_eq!(hits, vec![2, 2, 3, 3, 4]);
    }

    #[test]
    fn test_battle_log_groups_by_turn() {
        let mut log = BattleLog::new();
        assert!(log.is_empty());
        log.advance_turn();
        log.push(BattleEvent::TurnStarted { turn_number: 1 });
        log.push(BattleEvent::CriticalHit);
        log.advance_turn();
        log.push(BattleEvent::TurnStarted { turn_number: 2 });

        assert_eq!(log.turns().len(), 2);
        assert_eq!(log.len(), 3);
        assert_eq!(log.last_turn(), &[BattleEvent::TurnStarted { turn_number: 2 }]);
    }

    #[test]
    fn test_outcome_winner() {
        assert_eq!(BattleOutcome::Player1Win.winner(), Some(PlayerSide::Player1));
        assert_eq!(BattleOutcome::Draw.winner(), None);
        assert_eq!(BattleOutcome::win_for(PlayerSide::Player2), BattleOutcome::Player2Win);
    }
}
