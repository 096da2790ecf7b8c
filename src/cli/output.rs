//! Output formatting for CLI

use crate::{
    pipeline::{MetricsSummary, SimulationResult},
    q_learning::{QTable, State},
};

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

/// Format a rate in [0, 1] as a percentage
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print the totals of a simulation run
pub fn print_result(result: &SimulationResult) {
    print_subsection("Results");
    print_kv("Driver", &result.driver);
    print_kv("Trials", &format_number(result.trials));
    print_kv(
        "Arrivals",
        &format!(
            "{} ({})",
            format_number(result.successes),
            format_percent(result.success_rate)
        ),
    );
    print_kv("Final quarter", &format_percent(result.final_success_rate));
    print_kv("Total steps", &format_number(result.total_steps));
    print_kv("Total reward", &format!("{:.1}", result.total_reward));
    print_kv("Penalties", &format_number(result.penalties));
    if let Some(size) = result.table_size {
        print_kv("Q-table entries", &format_number(size));
    }
}

/// Print the per-trial averages collected by a metrics observer
pub fn print_metrics(summary: &MetricsSummary) {
    print_subsection("Per-trial metrics");
    print_kv("Avg steps", &format!("{:.2}", summary.avg_steps));
    print_kv("Avg reward", &format!("{:.2}", summary.avg_reward));
    let trial = |t: Option<usize>| t.map_or_else(|| "-".to_string(), |t| (t + 1).to_string());
    print_kv("First arrival", &trial(summary.first_arrival));
    print_kv("Last failure", &trial(summary.last_failure));
}

/// Print the learned values of one state and the greedy choice
pub fn print_state_values(state: &State, table: &QTable) {
    print_subsection(&format!("State {state}"));
    for (action, value) in table.action_values(state) {
        print_kv(action.as_str(), &format!("{value:.4}"));
    }
    print_kv("Greedy action", table.greedy_action(state).as_str());
}
