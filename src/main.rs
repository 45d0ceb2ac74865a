use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use stock_ranker::output::{self, RenderedRow};
use stock_ranker::scoring::{Ranking, ScoringEngine};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank candidates by composite score (default if no subcommand)
    Rank,
    /// Split an investment across the top-ranked candidates
    Advise {
        /// Number of top candidates to allocate across (defaults to half the snapshot)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Show the effective factor table
    Factors,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "stock-ranker")]
#[command(about = "Multi-factor stock ranking CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and per-factor breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/stock-ranker/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the JSON factor snapshot ("-" or omitted reads stdin)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn print_or_exit(result: anyhow::Result<String>) {
    match result {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Output error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

fn print_tsv(text: String) {
    if let Err(e) = output::write_output(&mut std::io::stdout().lock(), &text) {
        eprintln!("Output error: {}", e);
        std::process::exit(EXIT_INPUT);
    }
}

fn print_ranking(ranking: &Ranking, format: OutputFormat, verbose: bool) {
    let rows: Vec<RenderedRow> = output::render_ranking(ranking);
    match format {
        OutputFormat::Table => {
            println!("{}", output::format_table(&rows, output::should_use_colors()));
            if verbose && !ranking.is_empty() {
                println!();
                for candidate in ranking.iter() {
                    println!("{}", output::format_breakdown(candidate));
                }
            }
        }
        OutputFormat::Tsv => print_tsv(output::format_tsv(&rows)),
        OutputFormat::Json => print_or_exit(output::format_json(&rows)),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Rank);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match stock_ranker::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate everything at startup so all problems are reported at once
    if let Err(errors) = stock_ranker::scoring::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let engine = match ScoringEngine::from_config(&config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Commands::Factors = command {
        match cli.format {
            OutputFormat::Json => {
                let definitions: Vec<_> = engine.table().iter().collect();
                print_or_exit(output::format_json(&definitions))
            }
            _ => println!("{}", output::format_factor_table(engine.table())),
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let snapshot = match stock_ranker::snapshot::load_snapshot(cli.input.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    tracing::debug!(
        candidates = snapshot.len(),
        overrides = engine.overrides().len(),
        "ranking snapshot"
    );
    let ranking = engine.rank(&snapshot);

    match command {
        Commands::Rank => print_ranking(&ranking, cli.format, cli.verbose),
        Commands::Advise { count } => {
            let count = count
                .or(config.advice.as_ref().and_then(|a| a.count))
                .unwrap_or_else(|| stock_ranker::advice::default_count(ranking.len()));
            let advice = stock_ranker::advice::advise(&ranking, count);
            match cli.format {
                OutputFormat::Table => println!(
                    "{}",
                    output::format_advice_table(&advice, output::should_use_colors())
                ),
                OutputFormat::Tsv => print_tsv(output::format_advice_tsv(&advice)),
                OutputFormat::Json => print_or_exit(output::format_json(&advice)),
            }
        }
        Commands::Factors => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
