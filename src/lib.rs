// In: src/lib.rs

//! Pokemon Battle Simulator
//!
//! A deterministic Generation 1 battle engine built for agent self-play:
//! validated rulesets, seedable battles, pluggable agents and a parallel
//! round-robin evaluator.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod errors;
pub mod move_data;
pub mod moves;
pub mod player;
pub mod pokemon;
pub mod prefab_teams;
pub mod ruleset;
pub mod selfplay;
pub mod species;
pub mod teams;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, DamageFormula, HitDistribution, ModifiableStat, MoveEffect, PokemonType, SecondaryEffect, Status,
    Target,
};

// --- From this crate's modules (`src/`) ---

// Battle engine, state and agents.
pub use battle::ai::{ActionRanker, Behavior, LinearRanker, RandomAI, RankingAI, ScoringAI};
pub use battle::commands::PlayerSide;
pub use battle::runner::{Battle, MatchResult};
pub use battle::state::{BattleEvent, BattleOutcome, BattleRng, BattleState};

// Roster and format types.
pub use moves::Move;
pub use player::{BattlePlayer, PlayerAction};
pub use pokemon::{Dvs, PartyPokemon, StatExperience};
pub use ruleset::{Ruleset, RulesetBuilder};
pub use species::Species;

// Catalog access.
pub use move_data::get_move_data;
pub use species::get_species_data;

// Self-play harness.
pub use selfplay::{evaluate_population, reward, Competitor};
pub use teams::{BasicRivalTeamGenerator, PrefabTeamGenerator, TeamGenerator};

// Crate-specific error and result types.
pub use errors::{
    BattleEngineError, BattleResult, BattleStateError, MoveDataError, MoveDataResult, PokemonError, RulesetError,
    SpeciesDataError, SpeciesDataResult,
};
