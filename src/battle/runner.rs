use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::ai::Behavior;
use crate::battle::commands::{execute_command_batch, BattleCommand, PlayerSide};
use crate::battle::engine::{
    end_of_turn, execute_action, execute_switch, finish, first_to_move, get_valid_actions,
    get_valid_replacements, needs_replacement, update_result,
};
use crate::battle::state::{BattleEvent, BattleOutcome, BattleRng, BattleState};
use crate::errors::{BattleResult, BattleStateError};
use crate::player::PlayerAction;
use crate::pokemon::PartyPokemon;
use crate::ruleset::{Ruleset, MAX_TEAM_SIZE};

/// What a finished battle reports back.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub winner: Option<PlayerSide>,
    pub turns: u32,
}

/// One match between two agents. Owns the state, the agents and the single
/// random source every draw of the match comes from.
pub struct Battle {
    pub state: BattleState,
    pub rng: BattleRng,
    agents: [Box<dyn Behavior>; 2],
}

impl std::fmt::Debug for Battle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battle").field("state", &self.state).field("rng", &self.rng).finish()
    }
}

impl Battle {
    /// Validates both teams against `ruleset` and wraps them for battle.
    pub fn new(
        team1: &[Arc<PartyPokemon>],
        team2: &[Arc<PartyPokemon>],
        agents: [Box<dyn Behavior>; 2],
        ruleset: Arc<Ruleset>,
        rng: BattleRng,
    ) -> BattleResult<Self> {
        for team in [team1, team2] {
            if team.is_empty() || team.len() > MAX_TEAM_SIZE {
                return Err(BattleStateError::InvalidTeamSize(team.len()).into());
            }
            ruleset.validate_team(team).map_err(BattleStateError::IllegalTeam)?;
        }

        Ok(Self {
            state: BattleState::from_teams(team1, team2, ruleset),
            rng,
            agents,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.state.outcome
    }

    /// Plays one full turn: actions, order, execution, end-of-turn tick and
    /// forced replacements.
    pub fn play_turn(&mut self) -> Result<(), BattleStateError> {
        if self.state.is_finished() {
            return Err(BattleStateError::BattleFinished);
        }

        // --- Phase 1: Replacements left over from before the turn ---
        self.resolve_replacements()?;
        update_result(&mut self.state)?;
        if self.state.is_finished() {
            return Ok(());
        }

        // --- Phase 2: Start the turn ---
        self.state.log.advance_turn();
        execute_command_batch(vec![BattleCommand::IncrementTurnNumber], &mut self.state)?;
        let turn_number = self.state.turn_number;
        execute_command_batch(
            vec![BattleCommand::EmitEvent(BattleEvent::TurnStarted { turn_number })],
            &mut self.state,
        )?;
        debug!(turn = turn_number, "turn started");

        // --- Phase 3: Collect and order actions ---
        let actions = [self.request_action(PlayerSide::Player1), self.request_action(PlayerSide::Player2)];
        let first = first_to_move(&self.state, &actions, &mut self.rng);
        let second = first.opponent();

        // --- Phase 4: Execute actions ---
        execute_action(&mut self.state, first, actions[first.to_index()], &mut self.rng)?;
        if !self.any_active_fainted() {
            execute_action(&mut self.state, second, actions[second.to_index()], &mut self.rng)?;
        }

        // --- Phase 5: End of turn ---
        update_result(&mut self.state)?;
        if !self.state.is_finished() {
            end_of_turn(&mut self.state)?;
            update_result(&mut self.state)?;
        }

        // --- Phase 6: Forced replacements ---
        if !self.state.is_finished() {
            self.resolve_replacements()?;
        }
        Ok(())
    }

    /// Plays until the battle ends or the turn cap forces a draw.
    pub fn play(&mut self) -> BattleResult<MatchResult> {
        update_result(&mut self.state)?;
        let max_turns = self.state.ruleset.max_turns();

        while !self.state.is_finished() {
            if max_turns.is_some_and(|cap| self.state.turn_number >= cap) {
                finish(&mut self.state, BattleOutcome::Draw)?;
                break;
            }
            self.play_turn()?;
        }

        Ok(MatchResult {
            winner: self.state.outcome.and_then(BattleOutcome::winner),
            turns: self.state.turn_number,
        })
    }

    fn any_active_fainted(&self) -> bool {
        self.state.players.iter().any(|player| player.active_pokemon().is_fainted())
    }

    fn request_action(&mut self, side: PlayerSide) -> PlayerAction {
        let legal = get_valid_actions(&self.state, side);
        let action = self.agents[side.to_index()].choose_action(&self.state, side, &legal);
        assert!(
            legal.contains(&action),
            "agent for {:?} chose illegal action {:?}; legal: {:?}",
            side,
            action,
            legal
        );
        action
    }

    fn resolve_replacements(&mut self) -> Result<(), BattleStateError> {
        for side in PlayerSide::BOTH {
            if !needs_replacement(&self.state, side) {
                continue;
            }
            let legal = get_valid_replacements(&self.state, side);
            let action = self.agents[side.to_index()].choose_replacement(&self.state, side, &legal);
            let PlayerAction::SwitchPokemon { team_index } = action else {
                panic!("agent for {:?} answered a replacement request with {:?}", side, action);
            };
            assert!(
                legal.contains(&action),
                "agent for {:?} chose illegal replacement {:?}; legal: {:?}",
                side,
                action,
                legal
            );
            execute_switch(&mut self.state, side, team_index)?;
        }
        Ok(())
    }
}
