//! Table command - Inspect the transition rules

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::{
    cli::output::{print_kv, print_section, print_subsection},
    combat::{Action, GameState, Outcome, Rule, TransitionTable},
};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum TableFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(about = "Print the transition rule table")]
pub struct TableArgs {
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = TableFormat::Text)]
    pub format: TableFormat,
}

/// How much of the triple space the rules cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub triples: usize,
    pub modeled: usize,
    pub stochastic: usize,
    pub fixed: usize,
    pub fallback: usize,
}

impl Coverage {
    pub fn of(table: &TransitionTable) -> Self {
        let rules = table.rules();
        let stochastic = rules.iter().filter(|r| r.outcome.is_stochastic()).count();
        let triples = GameState::COUNT * Action::COUNT;
        Self {
            triples,
            modeled: rules.len(),
            stochastic,
            fixed: rules.len() - stochastic,
            fallback: triples - rules.len(),
        }
    }
}

#[derive(Serialize)]
struct TableReport {
    coverage: Coverage,
    rules: Vec<Rule>,
}

pub fn execute(args: TableArgs) -> Result<()> {
    let table = TransitionTable::standard();
    let coverage = Coverage::of(table);

    match args.format {
        TableFormat::Json => {
            let report = TableReport {
                coverage,
                rules: table.rules(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        TableFormat::Text => {
            print_section("Transition rules");
            for rule in table.rules() {
                println!(
                    "  {:<20} {:<6} -> {}",
                    rule.state().to_string(),
                    rule.action.label(),
                    describe(&rule.outcome)
                );
            }
            print_subsection("Coverage");
            print_kv("Triples", &coverage.triples.to_string());
            print_kv("Modeled", &coverage.modeled.to_string());
            print_kv("  stochastic", &coverage.stochastic.to_string());
            print_kv("  fixed", &coverage.fixed.to_string());
            print_kv(
                "Reset fallback",
                &format!("{} -> {}", coverage.fallback, GameState::NEUTRAL),
            );
        }
    }
    Ok(())
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Fixed(state) => state.to_string(),
        Outcome::Either([a, b]) => format!("{a} | {b} (p = 0.5)"),
    }
}
