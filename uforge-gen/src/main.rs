//! uforge-gen - Username Generation Pipeline
//!
//! Synthesizes candidate usernames from the lexicon, ranks them with a
//! panel of scoring oracles, validates the top candidates against a search
//! engine, and persists the accepted set.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uforge_common::config::Config;
use uforge_gen::dataset::SqlDatasetProvider;
use uforge_gen::db;
use uforge_gen::scoring::ChatScoringOracle;
use uforge_gen::validate::CseSearchClient;
use uforge_gen::workflow::{CycleConfig, Orchestrator};

#[derive(Parser)]
#[command(name = "uforge-gen", about = "Username generation pipeline", version)]
struct Cli {
    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one generation/scoring/validation cycle
    Run {
        /// Raw candidates to generate (overrides config)
        #[arg(long)]
        raw_count: Option<u32>,

        /// Top-ranked candidates to validate (overrides config)
        #[arg(long)]
        top_k: Option<u32>,

        /// Require the candidate as a standalone token in the snippet
        #[arg(long)]
        strict: bool,

        /// Remove source score records after the validation batch
        #[arg(long)]
        consume: bool,
    },

    /// Import a newline-delimited word list into the lexicon
    Seed {
        /// Word list file; leading-uppercase entries become names
        file: PathBuf,

        /// Clear the names/words tables before importing
        #[arg(long)]
        overwrite: bool,
    },

    /// Rebuild the numeric lexicon tables (years and common numbers)
    Regen,

    /// Print validated usernames with their archived scores
    Report {
        /// Maximum rows to print
        #[arg(long, default_value_t = 25)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    info!("Starting uforge-gen");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(cli.config.as_deref())?;
    let db_path = config.database_path();
    info!("Database: {}", db_path.display());

    let pool = uforge_common::db::init_database_pool(&db_path).await?;

    match cli.command {
        Command::Run {
            raw_count,
            top_k,
            strict,
            consume,
        } => {
            let scoring_key = config.scoring_api_key()?;
            let search_key = config.search_api_key()?;
            let engine_id = config.search_engine_id()?;

            let oracles = ChatScoringOracle::panel(&config.scoring, &scoring_key)?;
            let search = CseSearchClient::new(&config.search, search_key, engine_id)?;
            let provider = SqlDatasetProvider::new(pool.clone());

            let cycle_config = CycleConfig {
                raw_count: raw_count.unwrap_or(config.pipeline.raw_count),
                top_k: top_k.unwrap_or(config.pipeline.top_k),
                strict_match: strict || config.pipeline.strict_match,
                consume_source: consume || config.pipeline.consume_source,
                email_domain: config.email_domain.clone(),
            };

            let orchestrator =
                Orchestrator::new(&pool, &provider, &oracles, &search, cycle_config);

            let mut rng = StdRng::from_entropy();
            let outcome = orchestrator.run_cycle(&mut rng).await?;

            println!(
                "Cycle {}: generated {}, ranked {}, validated {}, consumed {}",
                outcome.run_id,
                outcome.generated,
                outcome.ranked,
                outcome.validated,
                outcome.consumed
            );
        }

        Command::Seed { file, overwrite } => {
            let content = std::fs::read_to_string(&file)?;
            let (names, words) = db::lexicon::seed_wordlist(&pool, content.lines(), overwrite).await?;
            println!("Imported {} names and {} words from {}", names, words, file.display());
        }

        Command::Regen => {
            db::lexicon::populate_numeric_tables(&pool).await?;
            println!("Numeric lexicon tables rebuilt");
        }

        Command::Report { limit } => {
            let rows = db::validated::final_report(&pool, limit).await?;
            if rows.is_empty() {
                println!("No validated usernames yet");
            }
            for row in rows {
                println!(
                    "username: {}, score: {:.2}, title: {}, url: {}",
                    row.username, row.score, row.title, row.url
                );
            }
        }
    }

    Ok(())
}
