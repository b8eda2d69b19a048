use thiserror::Error;

/// Main error type for the battle engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    #[error("Move data error: {0}")]
    MoveData(#[from] MoveDataError),
    #[error("Species data error: {0}")]
    SpeciesData(#[from] SpeciesDataError),
    #[error("Pokemon error: {0}")]
    Pokemon(#[from] PokemonError),
    #[error("Ruleset error: {0}")]
    Ruleset(#[from] RulesetError),
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    #[error("Battle task failed: {0}")]
    TaskFailed(String),
}

/// Errors related to move definitions and the move catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveDataError {
    #[error("Move not found: {0}")]
    MoveNotFound(String),
    #[error("{name}: PP must be positive")]
    InvalidPp { name: String },
    #[error("{name}: accuracy {accuracy}% is outside 1-100")]
    InvalidAccuracy { name: String, accuracy: u8 },
    #[error("{name}: priority {priority} is outside -1..=1")]
    InvalidPriority { name: String, priority: i8 },
    #[error("{name}: damaging moves need positive power")]
    InvalidPower { name: String },
    #[error("{name}: {details}")]
    InvalidEffect { name: String, details: String },
    #[error("Malformed move data: {0}")]
    MalformedData(String),
}

/// Errors related to species definitions and the pokedex.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeciesDataError {
    #[error("Species not found: {0}")]
    SpeciesNotFound(String),
    #[error("{name}: base {stat} of {value} is outside 0-255")]
    InvalidBaseStat {
        name: String,
        stat: &'static str,
        value: u16,
    },
    #[error("{name}: secondary type must differ from the primary type")]
    DuplicateType { name: String },
    #[error("{name}: moveset entry {move_name} is not a known move")]
    UnknownMove { name: String, move_name: String },
    #[error("Malformed species data: {0}")]
    MalformedData(String),
}

/// Errors raised while building a roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PokemonError {
    #[error("Level {0} is outside 1-100")]
    InvalidLevel(u8),
    #[error("A pokemon needs 1-4 move slots, got {0}")]
    InvalidMoveCount(usize),
    #[error("{stat} DV of {value} is above 15")]
    InvalidDv { stat: &'static str, value: u8 },
    #[error("{species} cannot learn {move_name}")]
    IllegalMove { species: String, move_name: String },
}

/// Errors raised while building a ruleset or validating a team against it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesetError {
    #[error("A ruleset needs at least one legal species")]
    NoSpecies,
    #[error("A ruleset needs at least one legal move")]
    NoMoves,
    #[error("Struggle must be legal when PP is enforced")]
    StruggleRequired,
    #[error("{0} has no legal moves")]
    SpeciesWithoutMoves(String),
    #[error("Max team size {0} is outside 1-6")]
    InvalidMaxTeamSize(usize),
    #[error("Max turns must be positive")]
    InvalidMaxTurns,
    #[error("Team size {size} is outside 1-{max}")]
    InvalidTeamSize { size: usize, max: usize },
    #[error("{0} is not a legal species")]
    IllegalSpecies(String),
    #[error("{move_name} is not a legal move for {species}")]
    IllegalMove { species: String, move_name: String },
    #[error("Species clause: {0} appears more than once")]
    DuplicateSpecies(String),
    #[error("OHKO clause: {0} is banned")]
    OhkoMoveBanned(String),
    #[error("Evasion clause: {0} is banned")]
    EvasionMoveBanned(String),
}

/// Errors related to battle construction and command execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    #[error("Team size {0} is outside 1-6")]
    InvalidTeamSize(usize),
    #[error("Invalid team: {0}")]
    IllegalTeam(RulesetError),
    #[error("HP {hp} exceeds max HP {max_hp}")]
    InvalidHp { hp: u16, max_hp: u16 },
    #[error("Invalid team slot: {0}")]
    InvalidPokemonIndex(usize),
    #[error("Invalid move slot: {0}")]
    InvalidMoveIndex(usize),
    #[error("Battle is already over")]
    BattleFinished,
}

/// Type alias for Results that can fail with battle engine errors
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results that can fail with move data errors
pub type MoveDataResult<T> = Result<T, MoveDataError>;

/// Type alias for Results that can fail with species data errors
pub type SpeciesDataResult<T> = Result<T, SpeciesDataError>;

pub type PokemonResult<T> = Result<T, PokemonError>;

pub type RulesetResult<T> = Result<T, RulesetError>;
