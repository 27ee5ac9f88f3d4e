mod logic;
mod storage;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{RunConfig, RunSummary, Strategy, run_autopilot};
use spacetruckers_game::{GameEngine, Leaderboard, ScoreEntry, SessionConfig, top_for_display};
use storage::{ScoreStore, SlotStore};

#[derive(Debug, Parser)]
#[command(name = "spacetruckers-tester", version = "0.1.0")]
#[command(about = "Headless autopilot runs for the Space Truckers economy")]
struct Args {
    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Days to simulate per run
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// Autopilot strategies (comma-separated: greedy,cautious,random)
    #[arg(long, default_value = "greedy")]
    strategies: String,

    /// Play in hardcore mode
    #[arg(long)]
    hardcore: bool,

    /// Per-day probability of a random market event
    #[arg(long, default_value_t = 0.2)]
    event_chance: f64,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory for JSON save slots and the leaderboard (in memory if omitted)
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// JSON session configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name used for leaderboard submissions
    #[arg(long, default_value = "Anonymous")]
    player: String,

    /// Submit each run's final credits to the leaderboard
    #[arg(long)]
    submit_score: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let session_cfg = load_session_config(&args)?;
    let strategies = parse_strategies(&args.strategies)?;
    let seeds = parse_seeds(&args.seeds)?;
    if !(0.0..=1.0).contains(&args.event_chance) {
        bail!("--event-chance must be between 0 and 1");
    }

    announce_banner();
    let start_time = Instant::now();
    let scores = ScoreStore::new(args.save_dir.as_deref());
    let (runs, board) = run_all(&args, &session_cfg, &strategies, &seeds, &scores)?;

    write_reports(&args, &runs, &board, start_time)?;

    if runs.iter().any(|run| !run.passed()) {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init();
}

fn announce_banner() {
    eprintln!("{}", "🚀 Space Truckers Autopilot".bright_cyan().bold());
    eprintln!("{}", "============================".cyan());
}

fn load_session_config(args: &Args) -> Result<SessionConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            SessionConfig::from_json(&json)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => SessionConfig::default(),
    };
    if args.hardcore {
        cfg.hardcore = true;
    }
    cfg.validate().context("invalid session configuration")?;
    Ok(cfg)
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_strategies(raw: &str) -> Result<Vec<Strategy>> {
    let tokens = split_csv(raw);
    if tokens.iter().any(|t| t == "all") {
        return Ok(Strategy::ALL.to_vec());
    }
    let strategies = tokens
        .iter()
        .map(|t| t.parse::<Strategy>().map_err(anyhow::Error::msg))
        .collect::<Result<Vec<_>>>()?;
    if strategies.is_empty() {
        bail!("no strategies selected");
    }
    Ok(strategies)
}

fn parse_seeds(raw: &str) -> Result<Vec<u64>> {
    let seeds = split_csv(raw)
        .iter()
        .map(|t| {
            t.parse::<u64>()
                .with_context(|| format!("invalid seed: {t}"))
        })
        .collect::<Result<Vec<_>>>()?;
    if seeds.is_empty() {
        bail!("no seeds given");
    }
    Ok(seeds)
}

fn run_all(
    args: &Args,
    session_cfg: &SessionConfig,
    strategies: &[Strategy],
    seeds: &[u64],
    scores: &ScoreStore,
) -> Result<(Vec<RunSummary>, Vec<ScoreEntry>)> {
    let mut runs = Vec::new();
    let mut board = Vec::new();
    for &strategy in strategies {
        for &seed in seeds {
            let label = format!("{strategy}-{seed}");
            let slots = SlotStore::for_run(args.save_dir.as_deref(), &label);
            let engine = GameEngine::new(slots, scores.clone());
            let cfg = RunConfig {
                seed,
                days: args.days,
                strategy,
                event_chance: args.event_chance,
                session: session_cfg.clone(),
            };
            let (summary, mut session) = run_autopilot(&engine, &cfg)?;
            if args.submit_score
                && let Some(updated) = engine.submit_score(&mut session, &args.player)
            {
                board = updated;
            }
            let status = if summary.passed() {
                "✅".to_string()
            } else {
                format!("❌ {} violation(s)", summary.violations.len())
            };
            eprintln!("{status} [{label}] {} cr on day {}", summary.credits, summary.final_day);
            runs.push(summary);
        }
    }
    if board.is_empty() && args.submit_score {
        board = scores
            .fetch()
            .map(|entries| top_for_display(&entries).to_vec())
            .unwrap_or_default();
    }
    Ok((runs, board))
}

fn write_reports(
    args: &Args,
    runs: &[RunSummary],
    board: &[ScoreEntry],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, runs)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, runs)?,
        "csv" => logic::reports::generate_csv_report(&mut output_target, runs)?,
        _ => {
            logic::reports::generate_console_report(
                &mut output_target,
                runs,
                board,
                start_time.elapsed(),
            )?;
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        assert_eq!(split_csv(" 1, ,2 ,3"), vec!["1", "2", "3"]);
    }

    #[test]
    fn strategies_expand_all_and_reject_unknown() {
        assert_eq!(parse_strategies("all").unwrap().len(), 3);
        assert_eq!(
            parse_strategies("cautious,greedy").unwrap(),
            vec![Strategy::Cautious, Strategy::Greedy]
        );
        assert!(parse_strategies("reckless").is_err());
        assert!(parse_strategies(" , ").is_err());
    }

    #[test]
    fn seeds_must_be_numeric() {
        assert_eq!(parse_seeds("7, 8").unwrap(), vec![7, 8]);
        assert!(parse_seeds("seven").is_err());
    }

    #[test]
    fn hardcore_flag_overrides_config() {
        let args = Args::parse_from(["spacetruckers-tester", "--hardcore"]);
        let cfg = load_session_config(&args).unwrap();
        assert!(cfg.hardcore);
        assert_eq!(cfg.starting_credits, 5_000);
    }
}
