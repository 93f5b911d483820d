// ABSA Command Line Entry Point
// Results go to stdout as JSON, logs go to stderr

use absa_core::absa::Aspect;
use absa_core::batch::{analyze_batch, read_records, read_reviews, BatchSummary};
use absa_core::config::AppConfig;
use absa_core::insights::{
    aspect_distribution, rating_mismatch, root_causes, AspectDistribution, RatingMismatch,
    WordCount, DEFAULT_MIN_RATING, DEFAULT_TOP_N,
};
use absa_core::models::{ReviewRequest, SentenceRequest};
use absa_core::preflight::run_preflight_checks;
use absa_core::telemetry;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use validator::Validate;

#[derive(Parser)]
#[command(name = "absa")]
#[command(about = "Aspect-based sentiment analysis for product reviews")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one sentence without aspect detection
    Sentiment { text: String },

    /// Per-aspect sentiment for one review
    Analyze {
        text: Option<String>,
        /// Read the review from stdin
        #[arg(long, conflicts_with = "text")]
        stdin: bool,
        /// Print the full report instead of the aspect map
        #[arg(long)]
        report: bool,
    },

    /// Analyze a JSON Lines file of reviews, one record per aspect verdict
    Batch {
        #[arg(long)]
        input: PathBuf,
        /// Write records here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Reviews in flight at once (1-64); defaults to ABSA_BATCH_CONCURRENCY
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=64))]
        concurrency: Option<u16>,
    },

    /// Aggregate statistics over batch records
    Insights {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = DEFAULT_MIN_RATING)]
        min_rating: f32,
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },

    /// Run preflight checks and print the report
    Check,
}

#[derive(Serialize)]
struct InsightsOutput {
    distribution: Vec<AspectDistribution>,
    rating_mismatch: RatingMismatch,
    root_causes: IndexMap<Aspect, Vec<WordCount>>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Cannot open {:?}", path))?;
    Ok(BufReader::new(file))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Invalid configuration")?;
    telemetry::init(config.log_format)?;

    if let Err(e) = run(cli, config).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Commands::Check => {
            let report = run_preflight_checks(&config);
            print_json(&report)?;
            if !report.ready_to_start {
                bail!("Preflight failed: {}", report.summary);
            }
        }

        Commands::Sentiment { text } => {
            let request = SentenceRequest { sentence: text };
            request.validate().context("Invalid sentence")?;

            let pipeline = config.build_pipeline().context("Cannot start analysis")?;
            let result = pipeline.classify_sentence(&request.sentence)?;
            print_json(&result)?;
        }

        Commands::Analyze {
            text,
            stdin,
            report,
        } => {
            let review = if stdin {
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read review from stdin")?;
                buffer
            } else {
                match text {
                    Some(text) => text,
                    None => bail!("Provide a review or pass --stdin"),
                }
            };
            let request = ReviewRequest { review };
            request.validate().context("Invalid review")?;

            let pipeline = config.build_pipeline().context("Cannot start analysis")?;
            if report {
                let report = pipeline.report(&request.review)?;
                info!("{}", report.summary());
                print_json(&report)?;
            } else {
                print_json(&pipeline.analyze_review(&request.review)?)?;
            }
        }

        Commands::Batch {
            input,
            output,
            concurrency,
        } => {
            let reviews = read_reviews(open_input(&input)?)?;
            let pipeline = Arc::new(config.build_pipeline().context("Cannot start analysis")?);
            let concurrency = concurrency
                .map(usize::from)
                .unwrap_or(config.batch_concurrency);

            let results = analyze_batch(pipeline, reviews, concurrency).await;

            let mut writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path).with_context(|| format!("Cannot create {:?}", path))?,
                )),
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };
            for record in results.iter().flat_map(|r| r.records()) {
                serde_json::to_writer(&mut writer, &record)?;
                writeln!(writer)?;
            }
            writer.flush()?;

            let summary = BatchSummary::from_results(&results);
            if summary.failed > 0 {
                bail!("{} of {} reviews failed", summary.failed, summary.total);
            }
        }

        Commands::Insights {
            input,
            min_rating,
            top,
        } => {
            let records = read_records(open_input(&input)?)?;
            info!("Computing insights over {} records", records.len());

            print_json(&InsightsOutput {
                distribution: aspect_distribution(&records),
                rating_mismatch: rating_mismatch(&records, min_rating),
                root_causes: root_causes(&records, top),
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_concurrency(args: &[&str]) -> Result<Option<u16>, clap::Error> {
        let cli = Cli::try_parse_from(args)?;
        match cli.command {
            Commands::Batch { concurrency, .. } => Ok(concurrency),
            _ => panic!("Expected batch command"),
        }
    }

    #[test]
    fn test_batch_concurrency_in_range() {
        let base = ["absa", "batch", "--input", "reviews.jsonl"];
        assert_eq!(batch_concurrency(&base).unwrap(), None);

        for value in ["1", "16", "64"] {
            let args = [&base[..], &["--concurrency", value][..]].concat();
            assert!(batch_concurrency(&args).is_ok(), "Expected {} to be accepted", value);
        }
    }

    #[test]
    fn test_batch_concurrency_out_of_range_rejected() {
        for value in ["0", "65", "100000", "-3"] {
            let args = ["absa", "batch", "--input", "reviews.jsonl", "--concurrency", value];
            assert!(
                batch_concurrency(&args).is_err(),
                "Expected {} to be rejected",
                value
            );
        }
    }
}
