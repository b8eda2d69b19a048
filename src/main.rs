use std::error::Error;
use std::sync::Arc;

use pokemon_battle_sim::battle::ai::{Behavior, RandomAI, ScoringAI};
use pokemon_battle_sim::battle::runner::Battle;
use pokemon_battle_sim::battle::state::BattleRng;
use pokemon_battle_sim::prefab_teams::get_prefab_teams;
use pokemon_battle_sim::ruleset::Ruleset;
use pokemon_battle_sim::selfplay::{evaluate_population, Competitor};
use pokemon_battle_sim::teams::{BasicRivalTeamGenerator, TeamGenerator};
use serde_json::json;

const DEFAULT_SEED: u64 = 2024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => DEFAULT_SEED,
    };

    // --- Example 1: One prefab battle with its text log ---
    let prefabs = get_prefab_teams();
    let (Some(red), Some(blue)) = (prefabs.first(), prefabs.get(1)) else {
        return Err("expected at least two prefab teams".into());
    };
    let ruleset = Arc::new(Ruleset::standard()?);
    let agents: [Box<dyn Behavior>; 2] = [Box::new(ScoringAI::new(seed)), Box::new(RandomAI::new(seed.wrapping_add(1)))];
    let mut battle = Battle::new(&red.build()?, &blue.build()?, agents, ruleset, BattleRng::from_seed(seed))?;
    let result = battle.play()?;

    println!("=== {} vs {} ===", red.name, blue.name);
    for (turn, lines) in battle.state.text_log().iter().enumerate() {
        println!("--- Turn {} ---", turn + 1);
        for line in lines {
            println!("  {}", line);
        }
    }
    println!();

    // --- Example 2: Round-robin self-play over the rival starters ---
    let competitors = vec![
        Competitor::new("random", |seed| Box::new(RandomAI::new(seed)) as Box<dyn Behavior>),
        Competitor::new("scoring", |seed| Box::new(ScoringAI::new(seed)) as Box<dyn Behavior>),
    ];
    let teams = BasicRivalTeamGenerator::new(seed)?.collect_teams();
    let rival_rules = Arc::new(Ruleset::basic_rival()?);
    let totals = evaluate_population(&competitors, &teams, rival_rules, seed).await?;

    let summary = json!({
        "seed": seed,
        "prefab_battle": result,
        "population_rewards": totals,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
