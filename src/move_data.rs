use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use schema::MoveRecord;

use crate::errors::{MoveDataError, MoveDataResult};
use crate::moves::{Move, STRUGGLE};

const MOVES_RON: &str = include_str!("../data/moves.ron");

// Global move data storage - parsed once on first lookup
static MOVE_DATA: LazyLock<MoveDataResult<HashMap<String, Arc<Move>>>> = LazyLock::new(load_moves);

fn load_moves() -> MoveDataResult<HashMap<String, Arc<Move>>> {
    let records: Vec<MoveRecord> =
        ron::from_str(MOVES_RON).map_err(|e| MoveDataError::MalformedData(e.to_string()))?;

    let mut moves = HashMap::with_capacity(records.len());
    for record in records {
        let move_ = Move::try_from(record)?;
        if moves.contains_key(move_.name()) {
            return Err(MoveDataError::MalformedData(format!(
                "duplicate move {}",
                move_.name()
            )));
        }
        moves.insert(move_.name().to_string(), Arc::new(move_));
    }

    if !moves.contains_key(STRUGGLE) {
        return Err(MoveDataError::MalformedData("Struggle is missing".to_string()));
    }

    tracing::debug!(moves = moves.len(), "loaded built-in movedex");
    Ok(moves)
}

/// Get move data for a specific move from the built-in catalog.
pub fn get_move_data(name: &str) -> MoveDataResult<Arc<Move>> {
    let moves = MOVE_DATA.as_ref().map_err(Clone::clone)?;
    moves
        .get(name)
        .cloned()
        .ok_or_else(|| MoveDataError::MoveNotFound(name.to_string()))
}

/// The universal fallback move.
pub fn struggle() -> MoveDataResult<Arc<Move>> {
    get_move_data(STRUGGLE)
}

/// Every built-in move, sorted by name.
pub fn all_moves() -> MoveDataResult<Vec<Arc<Move>>> {
    let moves = MOVE_DATA.as_ref().map_err(Clone::clone)?;
    let mut all: Vec<_> = moves.values().cloned().collect();
    all.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(all)
}

/// Resolves a list of move names, keeping the order.
pub fn moves_by_name(names: &[&str]) -> MoveDataResult<Vec<Arc<Move>>> {
    names.iter().map(|name| get_move_data(name)).collect()
}
