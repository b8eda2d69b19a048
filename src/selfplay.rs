//! Round-robin self-play evaluation over a population of agents.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::battle::ai::Behavior;
use crate::battle::commands::PlayerSide;
use crate::battle::runner::{Battle, MatchResult};
use crate::battle::state::BattleRng;
use crate::errors::{BattleEngineError, BattleResult};
use crate::ruleset::Ruleset;
use crate::teams::Team;

/// Reward per side for a finished battle. Shorter wins are worth more; a
/// draw pays both sides a quarter of a win.
pub fn reward(result: &MatchResult) -> [f64; 2] {
    let scale = (result.turns.max(1) as f64).sqrt();
    match result.winner {
        Some(PlayerSide::Player1) => [1.0 / scale, 0.0],
        Some(PlayerSide::Player2) => [0.0, 1.0 / scale],
        None => [0.25 / scale, 0.25 / scale],
    }
}

pub type AgentFactory = Arc<dyn Fn(u64) -> Box<dyn Behavior> + Send + Sync>;

/// A named member of the population. The factory builds a fresh agent from a
/// seed for every battle.
#[derive(Clone)]
pub struct Competitor {
    pub id: String,
    pub factory: AgentFactory,
}

impl Competitor {
    pub fn new<F>(id: impl Into<String>, factory: F) -> Self
    where
        F: Fn(u64) -> Box<dyn Behavior> + Send + Sync + 'static,
    {
        Self { id: id.into(), factory: Arc::new(factory) }
    }
}

impl fmt::Debug for Competitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Competitor").field("id", &self.id).finish()
    }
}

struct Pairing {
    index: usize,
    first: usize,
    second: usize,
    team1: Team,
    team2: Team,
    battle_seed: u64,
    agent_seeds: [u64; 2],
}

/// Battles every competitor `i` (side 1) against every competitor `j >= i`
/// (side 2) over every ordered pair of teams and sums the rewards per id.
/// Battles run on blocking tasks and share nothing; all seeds derive from
/// `seed`, so a rerun with the same inputs gives the same totals.
pub async fn evaluate_population(
    competitors: &[Competitor],
    teams: &[Team],
    ruleset: Arc<Ruleset>,
    seed: u64,
) -> BattleResult<BTreeMap<String, f64>> {
    let mut seeds = StdRng::seed_from_u64(seed);
    let mut pairings = Vec::new();
    for first in 0..competitors.len() {
        for second in first..competitors.len() {
            for team1 in teams {
                for team2 in teams {
                    pairings.push(Pairing {
                        index: pairings.len(),
                        first,
                        second,
                        team1: team1.clone(),
                        team2: team2.clone(),
                        battle_seed: seeds.random(),
                        agent_seeds: [seeds.random(), seeds.random()],
                    });
                }
            }
        }
    }
    info!(competitors = competitors.len(), battles = pairings.len(), "evaluating population");

    let mut tasks = JoinSet::new();
    for pairing in pairings {
        let agents = [
            (competitors[pairing.first].factory)(pairing.agent_seeds[0]),
            (competitors[pairing.second].factory)(pairing.agent_seeds[1]),
        ];
        let ruleset = ruleset.clone();
        tasks.spawn_blocking(move || -> BattleResult<(Pairing, MatchResult)> {
            let mut battle = Battle::new(
                &pairing.team1,
                &pairing.team2,
                agents,
                ruleset,
                BattleRng::from_seed(pairing.battle_seed),
            )?;
            let result = battle.play()?;
            Ok((pairing, result))
        });
    }

    let mut finished = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => finished.push(outcome?),
            Err(error) if error.is_panic() => std::panic::resume_unwind(error.into_panic()),
            Err(error) => return Err(BattleEngineError::TaskFailed(error.to_string())),
        }
    }
    // Sum in creation order so float totals do not depend on completion order.
    finished.sort_by_key(|(pairing, _)| pairing.index);

    let mut totals: BTreeMap<String, f64> =
        competitors.iter().map(|competitor| (competitor.id.clone(), 0.0)).collect();
    for (pairing, result) in &finished {
        let [first_reward, second_reward] = reward(result);
        debug!(
            battle = pairing.index,
            first = %competitors[pairing.first].id,
            second = %competitors[pairing.second].id,
            winner = ?result.winner,
            turns = result.turns,
            "battle finished"
        );
        *totals.entry(competitors[pairing.first].id.clone()).or_default() += first_reward;
        *totals.entry(competitors[pairing.second].id.clone()).or_default() += second_reward;
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::ai::{RandomAI, ScoringAI};
    use crate::teams::{BasicRivalTeamGenerator, TeamGenerator};
    use pretty_assertions::assert_eq;

    fn population() -> Vec<Competitor> {
        vec![
            Competitor::new("random", |seed| Box::new(RandomAI::new(seed)) as Box<dyn Behavior>),
            Competitor::new("scoring", |seed| Box::new(ScoringAI::new(seed)) as Box<dyn Behavior>),
        ]
    }

    fn rival_teams() -> Vec<Team> {
        BasicRivalTeamGenerator::new(1).unwrap().collect_teams()
    }

    #[test]
    fn test_reward_for_win() {
        let result = MatchResult { winner: Some(PlayerSide::Player2), turns: 16 };
        assert_eq!(reward(&result), [0.0, 0.25]);
    }

    #[test]
    fn test_reward_for_draw() {
        let result = MatchResult { winner: None, turns: 4 };
        assert_eq!(reward(&result), [0.125, 0.125]);
    }

    #[test]
    fn test_reward_clamps_zero_turns() {
        let result = MatchResult { winner: Some(PlayerSide::Player1), turns: 0 };
        assert_eq!(reward(&result), [1.0, 0.0]);
    }

    #[tokio::test]
    async fn test_population_evaluation_scores_every_competitor() {
        let ruleset = Arc::new(Ruleset::basic_rival().unwrap());
        let totals = evaluate_population(&population(), &rival_teams(), ruleset, 42).await.unwrap();

        assert_eq!(totals.keys().cloned().collect::<Vec<_>>(), vec!["random", "scoring"]);
        let sum: f64 = totals.values().sum();
        assert!(sum > 0.0, "some battle should pay out a reward");
        assert!(totals.values().all(|total| *total >= 0.0));
    }

    #[tokio::test]
    async fn test_population_evaluation_is_reproducible() {
        let ruleset = Arc::new(Ruleset::basic_rival().unwrap());
        let teams = rival_teams();

        let first = evaluate_population(&population(), &teams, ruleset.clone(), 9).await.unwrap();
        let second = evaluate_population(&population(), &teams, ruleset, 9).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_illegal_team_is_reported() {
        let ruleset = Arc::new(Ruleset::basic_rival().unwrap());
        let pikachu = crate::pokemon::PartyPokemon::from_names("Pikachu", 17, &["Thunder Shock"]).unwrap();
        let teams = vec![vec![Arc::new(pikachu)]];

        let result = evaluate_population(&population(), &teams, ruleset, 1).await;
        assert!(result.is_err());
    }
}
