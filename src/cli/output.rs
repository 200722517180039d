//! Output formatting and progress bars for CLI

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::{MetricsSummary, SessionResult};

/// Create a progress bar counting rounds across simulated sessions
pub fn create_simulation_progress(total_rounds: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total_rounds);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rounds ({msg})")
            .context("invalid progress bar template")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a rate as a percentage with one decimal
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, String)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Print round outcomes of one session
pub fn print_session_result(result: &SessionResult) {
    print_subsection("Rounds");
    for round in &result.rounds {
        let outcome = match (round.victor, round.aborted) {
            (_, true) => "aborted".to_string(),
            (Some(side), false) => format!("{side} wins"),
            (None, false) => "no victor".to_string(),
        };
        print_kv(
            &format!("Round {}", round.round + 1),
            &format!("{outcome} after {} steps", round.steps),
        );
    }
    print_stats_table(&[
        ("Total steps", format_number(result.total_steps)),
        (
            "Player wins",
            format!(
                "{} ({})",
                result.player_wins,
                format_percent(result.player_win_rate())
            ),
        ),
        (
            "Opponent wins",
            format!(
                "{} ({})",
                result.opponent_wins,
                format_percent(result.opponent_win_rate())
            ),
        ),
        ("Aborted rounds", result.aborted_rounds.to_string()),
    ]);
}

/// Print response metrics
pub fn print_metrics(metrics: &MetricsSummary) {
    print_subsection("Responses");
    for (action, count) in &metrics.action_counts {
        print_kv(action, &format_number(*count));
    }
    let mean_rt = metrics
        .mean_rt_ms
        .map_or_else(|| "n/a".to_string(), |rt| format!("{rt:.0} ms"));
    print_stats_table(&[
        ("Timeout rate", format_percent(metrics.timeout_rate)),
        ("Reset fallbacks", format_percent(metrics.fallback_rate)),
        ("Mean RT", mean_rt),
        ("Avg round length", format!("{:.2}", metrics.avg_round_length)),
    ]);
}
