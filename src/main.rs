use clap::{Parser, Subcommand};
use log::debug;
use std::path::{Path, PathBuf};

use wordwise::catalog::load_catalog;
use wordwise::config::{get_config_path, AppConfig};
use wordwise::models::{DifficultyLevel, JsonOutput, ReviewOutcome, Timestamp, WordRecord, WordType};
use wordwise::scheduler::ReviewScheduler;
use wordwise::simulate::{parse_outcomes, simulate};
use wordwise::stats::CatalogStats;

const DEFAULT_STEP_MS: i64 = 60 * 1000;

#[derive(Parser)]
#[command(name = "wordwise")]
#[command(about = "Decides which spelling word a young learner sees next")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Word catalog (JSON); overrides catalog_path from the config file
    #[arg(long, short, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,

    /// Show the word that would be offered next
    Next {
        /// Current time in milliseconds since epoch (defaults to now)
        #[arg(long)]
        now: Option<Timestamp>,
    },

    /// List words due for review
    Due {
        /// Current time in milliseconds since epoch (defaults to now)
        #[arg(long)]
        now: Option<Timestamp>,

        /// Only words of this type (noun, verb, adjective)
        #[arg(long = "type", short = 't')]
        word_type: Option<String>,

        /// Only words from this band (starters, movers, flyers, ket)
        #[arg(long, short)]
        level: Option<String>,
    },

    /// List words never answered correctly
    New {
        /// Only words of this type (noun, verb, adjective)
        #[arg(long = "type", short = 't')]
        word_type: Option<String>,

        /// Only words from this band (starters, movers, flyers, ket)
        #[arg(long, short)]
        level: Option<String>,
    },

    /// Show how a word changes after one attempt (the catalog is not modified)
    Review {
        /// Word ID
        id: String,

        /// Attempt outcome: correct/incorrect
        #[arg(long, short)]
        outcome: String,

        /// Current time in milliseconds since epoch (defaults to now)
        #[arg(long)]
        now: Option<Timestamp>,
    },

    /// Summarize the catalog
    Stats {
        /// Current time in milliseconds since epoch (defaults to now)
        #[arg(long)]
        now: Option<Timestamp>,
    },

    /// Play a scripted session against the catalog with a simulated clock
    Simulate {
        /// Comma-separated outcomes, e.g. c,c,x,c
        #[arg(long, short)]
        outcomes: String,

        /// Session start time in milliseconds since epoch (defaults to now)
        #[arg(long)]
        start: Option<Timestamp>,

        /// Milliseconds the clock advances before each answer
        #[arg(long, default_value_t = DEFAULT_STEP_MS)]
        step: i64,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = get_config_path();
    let config = AppConfig::load(&config_path)?;

    match cli.command {
        Commands::Init => {
            let created = if config_path.exists() {
                false
            } else {
                config.save(&config_path)?;
                true
            };
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "path": config_path,
                        "created": created
                    })))?
                );
            } else if created {
                println!("Config written to: {}", config_path.display());
            } else {
                println!("Config already exists at: {}", config_path.display());
            }
        }

        Commands::Next { now } => {
            let words = open_catalog(cli.catalog.as_deref(), &config, &config_path)?;
            let now = resolve_now(now);

            if let Some(word) = ReviewScheduler::pick_next_word(&words, now) {
                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::ok(word))?);
                } else {
                    println!("=== Next Word ===");
                    println!();
                    print_word(word);
                    println!();
                    println!("After the attempt, preview the update with:");
                    println!("  wordwise review {} --outcome <correct|incorrect>", word.id);
                }
            } else if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
            } else {
                println!("Nothing to practise right now. Every word is waiting for its review time.");
            }
        }

        Commands::Due {
            now,
            word_type,
            level,
        } => {
            let filter = WordFilter::parse(word_type.as_deref(), level.as_deref())?;
            let words = open_catalog(cli.catalog.as_deref(), &config, &config_path)?;
            let due = filter.apply(ReviewScheduler::select_due_words(&words, resolve_now(now)));
            print_word_list(&due, cli.json, "No words due for review.")?;
        }

        Commands::New { word_type, level } => {
            let filter = WordFilter::parse(word_type.as_deref(), level.as_deref())?;
            let words = open_catalog(cli.catalog.as_deref(), &config, &config_path)?;
            let new = filter.apply(ReviewScheduler::select_new_words(&words));
            print_word_list(&new, cli.json, "No new words left.")?;
        }

        Commands::Review { id, outcome, now } => {
            let review_outcome = ReviewOutcome::from_str(&outcome).ok_or_else(|| {
                format!("Invalid outcome '{}'. Use: correct or incorrect", outcome)
            })?;
            let words = open_catalog(cli.catalog.as_deref(), &config, &config_path)?;
            let Some(word) = words.iter().find(|w| w.id == id) else {
                if cli.json {
                    println!(
                        "{}",
                        serde_json::to_string(&JsonOutput::<()>::err("Word not found"))?
                    );
                } else {
                    println!("Word '{}' not found.", id);
                }
                return Ok(());
            };

            let updated =
                ReviewScheduler::process_review(word, review_outcome.is_correct(), resolve_now(now));

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&updated))?);
            } else {
                println!(
                    "'{}' answered {}.",
                    updated.word,
                    review_outcome.as_str()
                );
                println!(
                    "Mastery: {} ({}) -> {} ({})",
                    word.mastery_level,
                    word.mastery_level.label(),
                    updated.mastery_level,
                    updated.mastery_level.label()
                );
                println!("Next review: {}", format_time(updated.next_review_time));
            }
        }

        Commands::Stats { now } => {
            let words = open_catalog(cli.catalog.as_deref(), &config, &config_path)?;
            let stats = CatalogStats::collect(&words, resolve_now(now));
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&stats))?);
            } else {
                println!("=== Catalog Statistics ===");
                println!("Total words: {}", stats.total);
                println!("New: {}", stats.new_words);
                println!("Due for review: {}", stats.due_now);
                println!("Waiting: {}", stats.waiting);
                println!("Mastered (level 5): {}", stats.mastered);
                println!("Average mastery: {:.1}/5", stats.avg_mastery);
            }
        }

        Commands::Simulate {
            outcomes,
            start,
            step,
        } => {
            let outcomes = parse_outcomes(&outcomes)?;
            let words = open_catalog(cli.catalog.as_deref(), &config, &config_path)?;
            let report = simulate(
                words,
                config.session_config(),
                &outcomes,
                resolve_now(start),
                step,
            )?;

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&report))?);
            } else {
                println!(
                    "{:<4} {:<14} {:<10} {:<10} {:<7} NEXT REVIEW",
                    "#", "WORD", "ANSWER", "LEVEL", "SCORE"
                );
                println!("{}", "-".repeat(70));
                for (i, step) in report.steps.iter().enumerate() {
                    println!(
                        "{:<4} {:<14} {:<10} {:<10} {:<7} {}",
                        i + 1,
                        truncate(&step.word, 14),
                        step.outcome.as_str(),
                        format!("{} -> {}", step.mastery_before, step.mastery_after),
                        step.score,
                        format_time(step.next_review_time)
                    );
                }
                let state = &report.final_state;
                println!();
                println!(
                    "Score: {}  Hearts: {}  Streak: {}  Completed: {}/{}{}",
                    state.score,
                    state.hearts,
                    state.streak,
                    state.words_completed_today,
                    state.daily_goal,
                    if state.is_finished { "  (finished)" } else { "" }
                );
            }
        }
    }

    Ok(())
}

fn open_catalog(
    explicit: Option<&Path>,
    config: &AppConfig,
    config_path: &Path,
) -> Result<Vec<WordRecord>, Box<dyn std::error::Error>> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| config.catalog_path.clone())
        .ok_or_else(|| {
            format!(
                "No catalog given. Pass --catalog or set catalog_path in {}",
                config_path.display()
            )
        })?;
    debug!("using catalog {}", path.display());
    Ok(load_catalog(&path)?)
}

#[derive(Debug, Default, PartialEq)]
struct WordFilter {
    word_type: Option<WordType>,
    level: Option<DifficultyLevel>,
}

impl WordFilter {
    fn parse(word_type: Option<&str>, level: Option<&str>) -> Result<Self, String> {
        let word_type = word_type
            .map(|t| {
                WordType::from_str(t).ok_or_else(|| {
                    format!("Invalid type '{}'. Use: noun, verb, adjective", t)
                })
            })
            .transpose()?;
        let level = level
            .map(|l| {
                DifficultyLevel::from_str(l).ok_or_else(|| {
                    format!("Invalid level '{}'. Use: starters, movers, flyers, ket", l)
                })
            })
            .transpose()?;
        Ok(Self { word_type, level })
    }

    /// Keeps catalog order.
    fn apply<'a>(&self, words: Vec<&'a WordRecord>) -> Vec<&'a WordRecord> {
        words
            .into_iter()
            .filter(|w| self.word_type.map_or(true, |t| w.word_type == t))
            .filter(|w| self.level.map_or(true, |l| w.level == l))
            .collect()
    }
}

fn resolve_now(now: Option<Timestamp>) -> Timestamp {
    now.unwrap_or_else(|| chrono::Utc::now().timestamp_millis())
}

fn format_time(ms: Timestamp) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ms.to_string())
}

fn print_word(word: &WordRecord) {
    println!("Word: {} (ID: {})", word.word, word.id);
    println!("Type: {}  Level: {}", word.word_type.as_str(), word.level.as_str());
    if let Some(meaning) = &word.meaning {
        println!("Meaning: {}", meaning);
    }
    if let Some(example) = &word.example {
        println!("Example: {}", example);
    }
    if let Some(tip) = &word.memory_tip {
        println!("Tip: {}", tip);
    }
    println!(
        "Mastery: {} (level {})",
        word.mastery_level.label(),
        word.mastery_level
    );
    if word.is_new() {
        println!("Status: new word");
    } else {
        println!("Status: review, due {}", format_time(word.next_review_time));
    }
}

fn print_word_list(
    words: &[&WordRecord],
    json: bool,
    empty_message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(&JsonOutput::ok(words))?);
    } else if words.is_empty() {
        println!("{}", empty_message);
    } else {
        println!("{:<8} {:<20} {:<12} {:<6} NEXT REVIEW", "ID", "WORD", "TYPE", "LEVEL");
        println!("{}", "-".repeat(70));
        for w in words {
            let next = if w.is_new() {
                String::from("-")
            } else {
                format_time(w.next_review_time)
            };
            println!(
                "{:<8} {:<20} {:<12} {:<6} {}",
                truncate(&w.id, 8),
                truncate(&w.word, 20),
                w.word_type.as_str(),
                w.mastery_level.to_string(),
                next
            );
        }
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
