use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{FixedOffset, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use chatcloud::activity::time_of_day::{build_histogram, midnight, ActivityOptions};
use chatcloud::config::Config;
use chatcloud::export::loader::{load_chats, select_chat};
use chatcloud::output::{terminal, weights};
use chatcloud::words::counter::MessageFilter;
use chatcloud::words::exclusion::ExclusionSet;
use chatcloud::words::frequency::RelativeFrequencyScorer;
use chatcloud::words::traits::WordScorer;

/// Show a progress bar once the comparison corpus is at least this big.
const PROGRESS_MIN_CHATS: usize = 20;

/// Chatcloud: find the words that make one chat different from the rest.
///
/// Reads a Telegram JSON export and writes word-cloud weights for a chat,
/// scored against every other chat in the same export.
#[derive(Parser)]
#[command(name = "chatcloud", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a chat's words against the rest of the export
    Scores {
        /// Path to the JSON export file
        file: PathBuf,

        /// Chat to analyze (optional when the export holds a single chat)
        chat: Option<String>,

        /// Comma-separated words to exclude (case-insensitive)
        #[arg(long, value_name = "WORDS")]
        exclude: Option<String>,

        /// Don't exclude the built-in list of short Russian function words
        #[arg(long)]
        no_default_exclude: bool,

        /// Also exclude the stop-word list for this language (e.g. english)
        #[arg(long, value_name = "LANG")]
        stop_words: Option<String>,

        /// Only count "message" records, skipping service events
        #[arg(long)]
        messages_only: bool,

        /// Number of words to show in the terminal
        #[arg(long)]
        top: Option<usize>,

        /// Weight file to write (default: <chat>-wc.json)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// List the chats in an export
    Chats {
        /// Path to the JSON export file
        file: PathBuf,
    },

    /// Export words written per time-of-day slot as CSV
    Activity {
        /// Path to the JSON export file
        file: PathBuf,

        /// Slot width in minutes (must divide 1440)
        #[arg(long, default_value = "10")]
        slot_minutes: u32,

        /// Only count messages sent after the start of this date (YYYY-MM-DD)
        #[arg(long, default_value = "2022-01-01")]
        since: NaiveDate,

        /// Drop chats with fewer words than this in total
        #[arg(long, default_value = "10000")]
        min_words: u64,

        /// Hours east of UTC used for the time of day (default: 0)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        utc_offset: i32,

        /// CSV file to write (default: timeofday.csv)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chatcloud=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Scores {
            file,
            chat,
            exclude,
            no_default_exclude,
            stop_words,
            messages_only,
            top,
            output,
        } => {
            let chats = load_chats(&file)?;
            let (target, others) = select_chat(&chats, chat.as_deref())?;

            let mut excluded = if no_default_exclude {
                ExclusionSet::new()
            } else {
                ExclusionSet::default_russian()
            };
            excluded.extend(&config.extra_excluded);
            if let Some(list) = exclude.as_deref() {
                excluded.extend(&ExclusionSet::parse_list(list));
            }
            if let Some(lang) = stop_words.as_deref().or(config.stop_words.as_deref()) {
                excluded.extend_with_language(lang)?;
            }

            let filter = if messages_only {
                MessageFilter::MessagesOnly
            } else {
                MessageFilter::All
            };

            if others.is_empty() {
                warn!("Only one chat in the export, scores are plain relative frequencies");
            }
            info!(
                chat = %target.name,
                comparison_chats = others.len(),
                excluded = excluded.len(),
                "Scoring chat"
            );

            let scorer = RelativeFrequencyScorer::new(excluded)
                .with_filter(filter)
                .with_progress(others.len() >= PROGRESS_MIN_CHATS);
            let scores = scorer.score(target, &others);

            terminal::display_scores(&scores, top.unwrap_or(config.top_n), &target.name);

            let path = config.output_path(output, &format!("{}-wc.json", target.name));
            weights::write_weights(&scores, &path)?;
            println!(
                "{}",
                format!("Word weights saved to: {}", path.display()).bold()
            );
        }

        Commands::Chats { file } => {
            let chats = load_chats(&file)?;
            terminal::display_chat_list(&chats);
        }

        Commands::Activity {
            file,
            slot_minutes,
            since,
            min_words,
            utc_offset,
            output,
        } => {
            let offset = utc_offset
                .checked_mul(3600)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| {
                    anyhow::anyhow!("UTC offset must be between -23 and 23 hours, got {utc_offset}")
                })?;
            let options = ActivityOptions {
                slot_minutes,
                since: midnight(since, offset),
                min_total_words: min_words,
                offset,
            };

            let chats = load_chats(&file)?;
            let histogram = build_histogram(&chats, &options)?;

            if histogram.names().is_empty() {
                println!(
                    "{}",
                    format!("No chat reached {min_words} words after {since}.").dimmed()
                );
            }

            let path = config.output_path(output, "timeofday.csv");
            std::fs::write(&path, histogram.to_csv())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{}",
                format!(
                    "Activity for {} chats saved to: {}",
                    histogram.names().len(),
                    path.display()
                )
                .bold()
            );
        }
    }

    Ok(())
}
