use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use spacetruckers_game::ScoreEntry;

use super::RunSummary;

pub fn generate_console_report(
    out: &mut dyn Write,
    runs: &[RunSummary],
    leaderboard: &[ScoreEntry],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Autopilot Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "============================".cyan())?;

    let total = runs.len();
    let passed = runs.iter().filter(|r| r.passed()).count();
    writeln!(out, "Total runs: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for run in runs {
        let status = if run.passed() {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{} {} seed {}",
            status,
            run.strategy.bold(),
            run.seed
        )?;
        writeln!(
            out,
            "   Day {} | {} cr | rep {} | {} ship(s)",
            run.final_day, run.credits, run.reputation, run.fleet_size
        )?;
        writeln!(
            out,
            "   Deliveries: {} on time, {} late | Breakdowns: {} | Quests: {}",
            run.on_time, run.late, run.breakdowns, run.quests_completed
        )?;
        if !run.violations.is_empty() {
            writeln!(out, "   Violations:")?;
            for violation in &run.violations {
                writeln!(out, "     • {}", violation.red())?;
            }
        }
        writeln!(out)?;
    }

    if let Some(best) = runs.iter().max_by_key(|r| r.credits) {
        writeln!(out, "{}", "💰 Best Run".bright_yellow().bold())?;
        writeln!(out, "{}", "===========".yellow())?;
        writeln!(
            out,
            "{} seed {} with {} cr",
            best.strategy.green(),
            best.seed,
            best.credits
        )?;
    }

    if !leaderboard.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "🏆 Leaderboard".bright_magenta().bold())?;
        for (rank, entry) in leaderboard.iter().enumerate() {
            writeln!(out, "{}. {} - {} cr", rank + 1, entry.name, entry.profit)?;
        }
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, runs: &[RunSummary]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, runs)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, runs: &[RunSummary]) -> Result<()> {
    writeln!(out, "# Space Truckers Autopilot Results\n")?;

    let passed = runs.iter().filter(|r| r.passed()).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total runs**: {}", runs.len())?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}\n", runs.len() - passed)?;

    writeln!(out, "## Runs\n")?;
    writeln!(
        out,
        "| Strategy | Seed | Day | Credits | Rep | Fleet | On time | Late | Breakdowns | Quests | Status |"
    )?;
    writeln!(
        out,
        "|---|---|---|---|---|---|---|---|---|---|---|"
    )?;
    for run in runs {
        let status = if run.passed() { "✅" } else { "❌" };
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
            run.strategy,
            run.seed,
            run.final_day,
            run.credits,
            run.reputation,
            run.fleet_size,
            run.on_time,
            run.late,
            run.breakdowns,
            run.quests_completed,
            status
        )?;
    }

    let failing: Vec<&RunSummary> = runs.iter().filter(|r| !r.passed()).collect();
    if !failing.is_empty() {
        writeln!(out, "\n## Violations\n")?;
        for run in failing {
            writeln!(out, "### {} seed {}\n", run.strategy, run.seed)?;
            for violation in &run.violations {
                writeln!(out, "- {violation}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, runs: &[RunSummary]) -> Result<()> {
    writeln!(
        out,
        "strategy,seed,final_day,credits,reputation,fleet_size,on_time,late,breakdowns,quests_completed,market_events,violations"
    )?;
    for run in runs {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            run.strategy,
            run.seed,
            run.final_day,
            run.credits,
            run.reputation,
            run.fleet_size,
            run.on_time,
            run.late,
            run.breakdowns,
            run.quests_completed,
            run.market_events,
            run.violations.len()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<RunSummary> {
        vec![
            RunSummary {
                seed: 7,
                strategy: "greedy".to_string(),
                final_day: 31,
                credits: 12_400,
                on_time: 9,
                ..RunSummary::default()
            },
            RunSummary {
                seed: 8,
                strategy: "random".to_string(),
                violations: vec!["day 3 after advance: fleet is empty".to_string()],
                ..RunSummary::default()
            },
        ]
    }

    #[test]
    fn csv_has_header_and_one_row_per_run() {
        let mut buf = Vec::new();
        generate_csv_report(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("greedy,7,31,12400,"));
        assert!(lines[2].ends_with(",1"));
    }

    #[test]
    fn json_report_is_an_array() {
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[0]["on_time"], 9);
    }

    #[test]
    fn markdown_lists_violations() {
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("## Violations"));
        assert!(text.contains("fleet is empty"));
    }

    #[test]
    fn console_report_includes_leaderboard() {
        colored::control::set_override(false);
        let board = vec![ScoreEntry {
            name: "Ripley".to_string(),
            profit: 12_400,
            submitted_at: 1,
        }];
        let mut buf = Vec::new();
        generate_console_report(&mut buf, &sample(), &board, Duration::from_millis(5)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("1. Ripley - 12400 cr"));
        assert!(text.contains("❌ FAIL random seed 8"));
    }
}
