//! survey - generate and analyze the gradability surveys
//!
//! Usage:
//!   survey make-faultless          # Sample adjectives and publish survey one
//!   survey make-word-order         # Draw order pairs and publish survey two
//!   survey analyze-faultless       # Mean disagreement per adjective class
//!   survey analyze-word-order      # Kruskal-Wallis over preference groups

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use gradability_survey::analysis::{Descriptives, KruskalWallis};
use gradability_survey::chart::RasterChartSink;
use gradability_survey::config::{Backend, SurveyConfig};
use gradability_survey::orchestrator::{faultless, word_order, SurveyContext};
use gradability_survey::utils::init_logging;

#[derive(Parser)]
#[command(name = "survey")]
#[command(about = "Stimulus generation and response analysis for adjective-order surveys")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Worksheet backend (overrides the config file)
    #[arg(long, value_enum, global = true)]
    backend: Option<Backend>,

    /// Directory for the json-dir backend
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and publish the faultless-disagreement survey
    #[command(name = "make-faultless")]
    MakeFaultless {
        /// Override the sampling seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Build and publish the word-order preference survey
    #[command(name = "make-word-order")]
    MakeWordOrder {
        /// Override the draw seed
        #[arg(long)]
        seed: Option<u64>,

        /// Number of draws before deduplication
        #[arg(short = 'n', long)]
        draws: Option<usize>,
    },

    /// Analyze faultless-disagreement results
    #[command(name = "analyze-faultless")]
    AnalyzeFaultless,

    /// Analyze word-order preference results
    #[command(name = "analyze-word-order")]
    AnalyzeWordOrder,
}

fn print_groups(groups: &[Descriptives]) {
    for g in groups {
        match g.std_dev {
            Some(sd) => println!("  {:<20} n={:<4} mean={:>8.3}  sd={:>8.3}", g.name, g.n, g.mean, sd),
            None => println!("  {:<20} n={:<4} mean={:>8.3}  sd=     n/a", g.name, g.n, g.mean),
        }
    }
}

fn print_test(test: &KruskalWallis) {
    println!("Kruskal-Wallis statistic: {}", test.statistic);
    println!("P-value: {}", test.p_value);
    println!("Degrees of freedom: {}", test.df);
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = SurveyConfig::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let store = config.open_store().context("Failed to open worksheet backend")?;
    let charts = RasterChartSink::default();

    match cli.command {
        Commands::MakeFaultless { seed } => {
            if let Some(seed) = seed {
                config.faultless.seed = seed;
            }
            let ctx = SurveyContext::new(store.as_ref(), &charts, &config);
            let run = faultless::make_survey(&ctx).await.context("Failed to build faultless survey")?;
            println!(
                "{:?} '{}' with {} questions ({} adjectives sampled from {})",
                run.outcome,
                config.faultless.survey_worksheet,
                run.sheet.len(),
                run.stimuli.sample.len(),
                run.stimuli.sample.pool_size
            );
            for quota in &run.stimuli.sample.quotas {
                println!("  {:<20} {:>3} of {:>3}", quota.key, quota.drawn, quota.available);
            }
        }
        Commands::MakeWordOrder { seed, draws } => {
            if let Some(seed) = seed {
                config.word_order.seed = seed;
            }
            if let Some(draws) = draws {
                config.word_order.draws = draws;
            }
            let ctx = SurveyContext::new(store.as_ref(), &charts, &config);
            let run = word_order::make_survey(&ctx).await.context("Failed to build word-order survey")?;
            println!(
                "{:?} '{}' with {} unique items",
                run.outcome,
                config.word_order.survey_worksheet,
                run.items.len()
            );
            for item in &run.items {
                println!("  {}  |  {}", item.predicted, item.alternate);
            }
        }
        Commands::AnalyzeFaultless => {
            let ctx = SurveyContext::new(store.as_ref(), &charts, &config);
            let report = faultless::analyze_results(&ctx).await.context("Failed to analyze faultless results")?;
            println!("Predicted order (highest disagreement first):");
            for m in &report.means {
                println!("  {:<15} {:<15} {:>6.2}%  (n={})", m.category, m.kind, m.mean, m.n);
            }
            print_groups(&report.categories);
            if let Some(test) = &report.test {
                print_test(test);
            }
        }
        Commands::AnalyzeWordOrder => {
            let ctx = SurveyContext::new(store.as_ref(), &charts, &config);
            let report = word_order::analyze_results(&ctx).await.context("Failed to analyze word-order results")?;
            for rating in &report.rating_means {
                println!("  {} {:<35} {:>8.3}", rating.rating, rating.label, rating.mean);
            }
            print_groups(&report.groups);
            print_test(&report.test);
        }
    }

    info!("charts written under {}", config.output_dir.display());
    Ok(())
}
