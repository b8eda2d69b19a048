pub mod ai;
pub mod battling;
pub mod calculators;
pub mod commands;
pub mod conditions;
pub mod engine;
pub mod move_effects;
pub mod runner;
pub mod state;
pub mod stats;

#[cfg(test)]
mod tests;
