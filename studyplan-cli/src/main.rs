use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use studyplan_core::time::{format_local, local_now, parse_local};
use studyplan_core::{Deck, Scheduler, Task, TaskStats};

mod config;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "studyplan", version, about = "Study planner: scheduling and spaced repetition")]
struct Cli {
    /// Override "now" with a local timestamp like "2026-03-02 08:00"
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack pending tasks into time blocks over the horizon
    Schedule {
        /// JSON task snapshot
        #[arg(long)]
        tasks: PathBuf,

        /// Horizon in days (default: from config)
        #[arg(long)]
        days: Option<i64>,
    },

    /// Show the most urgent startable tasks
    Recommend {
        #[arg(long)]
        tasks: PathBuf,

        /// Number of tasks (default: from config)
        #[arg(long)]
        count: Option<usize>,
    },

    /// List cards due for review in a deck
    Due {
        /// JSON deck snapshot
        #[arg(long)]
        deck: PathBuf,
    },

    /// Record a review outcome and write the deck back
    Review {
        #[arg(long)]
        deck: PathBuf,

        #[arg(long)]
        card: String,

        /// 0 (blackout) to 5 (perfect recall)
        #[arg(long, allow_hyphen_values = true)]
        quality: i32,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.studyplan/config.toml with defaults
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cfg.logging.level.as_str()),
    )
    .init();

    let now = resolve_now(cli.now.as_deref(), &cfg)?;

    match cli.command {
        Command::Schedule { tasks, days } => {
            let days = days.unwrap_or(cfg.scheduler.horizon_days);
            schedule(&tasks, days, now, &cfg)?;
        }

        Command::Recommend { tasks, count } => {
            let count = count.unwrap_or(cfg.scheduler.recommend_count);
            recommend(&tasks, count, now, &cfg)?;
        }

        Command::Due { deck } => {
            due(&deck, now)?;
        }

        Command::Review { deck, card, quality } => {
            review(&deck, &card, quality, now)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config(&cfg)?,
        },
    }

    Ok(())
}

fn resolve_now(flag: Option<&str>, cfg: &Config) -> Result<NaiveDateTime> {
    match flag {
        Some(s) => parse_local(s),
        None => local_now(&cfg.locale.timezone),
    }
}

fn schedule(path: &Path, days: i64, now: NaiveDateTime, cfg: &Config) -> Result<()> {
    let tasks: Vec<Task> = state::read_snapshot(path)?;
    let scheduler = Scheduler::new(cfg.scheduler.engine)?;
    let blocks = scheduler.generate_schedule(&tasks, now, days)?;
    info!("scheduled {} blocks from {}", blocks.len(), path.display());

    println!("# Schedule from {} ({} days)\n", format_local(now), days);
    if blocks.is_empty() {
        println!("(nothing to schedule)");
        return Ok(());
    }

    for b in &blocks {
        println!(
            "{} - {} | {}h | {} ({})",
            format_local(b.start),
            b.end.format("%H:%M"),
            b.duration_hours(),
            b.title,
            b.task_id
        );
    }

    let stats = TaskStats::from_tasks(&tasks);
    let planned: i64 = blocks.iter().map(|b| b.duration_hours()).sum();
    println!(
        "\nPlanned {}h across {} blocks; {} of {} tasks already completed.",
        planned,
        blocks.len(),
        stats.completed,
        tasks.len()
    );
    Ok(())
}

fn recommend(path: &Path, count: usize, now: NaiveDateTime, cfg: &Config) -> Result<()> {
    let tasks: Vec<Task> = state::read_snapshot(path)?;
    let scheduler = Scheduler::new(cfg.scheduler.engine)?;
    let top = scheduler.recommended_tasks(&tasks, now, count);

    println!("# Top {} tasks at {}\n", count, format_local(now));
    for (i, t) in top.iter().enumerate() {
        println!(
            "{}. [{:?}] urgency={:.2} | {} | due {} | {}h left",
            i + 1,
            t.priority,
            t.urgency_score(now),
            t.title,
            format_local(t.due),
            t.remaining_hours()
        );
    }
    Ok(())
}

fn due(path: &Path, now: NaiveDateTime) -> Result<()> {
    let deck: Deck = state::read_snapshot(path)?;
    let due = deck.cards_due_for_review(now);

    println!(
        "# {}: {} of {} cards due (avg mastery {:.1}%)\n",
        deck.name,
        due.len(),
        deck.total_cards(),
        deck.average_mastery()
    );
    for c in due {
        println!("- [{}] {} | {}", c.difficulty_level(), c.id, c.question);
    }
    Ok(())
}

fn review(path: &Path, card_id: &str, quality: i32, now: NaiveDateTime) -> Result<()> {
    let mut deck: Deck = state::read_snapshot(path)?;

    let card = deck
        .record_review(card_id, quality, now)
        .with_context(|| format!("reviewing {card_id}"))?
        .clone();
    state::write_snapshot(path, &deck)?;

    println!(
        "{} -> {} | interval {}d | next review {} | ease {:.2}",
        card.id,
        card.difficulty_level(),
        card.interval_days,
        format_local(card.next_review),
        card.ease_factor as f64 / 1000.0
    );
    Ok(())
}
