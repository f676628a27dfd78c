//! Ability Tracker - Entry Point
//!
//! Sets up the async runtime, opens the data file, and runs a terminal loop
//! for managing tasks. Completing or abandoning a task classifies it in the
//! background and levels up the related abilities.

use ability_tracker::abilities::{AbilitySet, EXPERIENCE_PER_LEVEL};
use ability_tracker::core::error::{Result, TrackerError};
use ability_tracker::core::TrackerConfig;
use ability_tracker::llm::{LlmClient, TaskClassifier};
use ability_tracker::progression::ProgressionCoordinator;
use ability_tracker::store::{AbilityStore, FileStore, KeyValueStore};
use ability_tracker::tasks::{Resolution, Task, TaskBoard};

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ability_tracker", about = "Tasks that level up your abilities")]
struct Args {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data file (overrides the config)
    #[arg(long)]
    data_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    }
    .apply_env_overrides()?;
    if let Some(path) = args.data_file {
        config.data_file = path;
    }
    config.validate()?;

    // Initialize tracing for logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Ability Tracker starting...");

    // Background classification runs on this runtime
    let rt = Runtime::new()?;
    let _enter = rt.enter();

    let kv: Arc<dyn KeyValueStore> = Arc::new(rt.block_on(FileStore::open(&config.data_file))?);
    let store = rt.block_on(AbilityStore::open(kv.clone()));
    let mut board = rt.block_on(TaskBoard::load(kv));

    if let Ok(key) = std::env::var("LLM_API_KEY") {
        rt.block_on(store.save_credential(&key))?;
    }

    let client = LlmClient::from_config(&config)?;
    let coordinator = Arc::new(ProgressionCoordinator::new(
        store.clone(),
        TaskClassifier::new(Arc::new(client)),
    ));

    rt.spawn(watch_level_ups(store.subscribe(), rt.block_on(store.snapshot())));

    let credential = rt.block_on(store.credential());
    if credential.is_none() {
        tracing::warn!("No API key configured - use `key <api-key>` to enable classification");
    }
    let welcome = rt.block_on(
        coordinator
            .classifier()
            .welcome_message(credential.as_deref()),
    );

    println!("\n=== ABILITY TRACKER ===");
    println!("{}", welcome);
    println!();
    print_help();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match command {
            "quit" | "q" => break,
            "help" | "h" => print_help(),
            "add" | "a" => match rt.block_on(board.add(rest)) {
                Ok(task) => println!("Added: {}", task.content),
                Err(TrackerError::EmptyTask) => println!("Usage: add <task>"),
                Err(e) => println!("Could not add task: {}", e),
            },
            "list" | "l" => display_current(&board),
            "done" | "d" => resolve(&rt, &mut board, &coordinator, rest, Resolution::Completed),
            "drop" => resolve(&rt, &mut board, &coordinator, rest, Resolution::Abandoned),
            "history" => display_history(&board),
            "stats" => {
                let stats = board.stats();
                println!(
                    "Total: {}  Completion rate: {}%  Streak: {}",
                    stats.total,
                    stats.completion_rate(),
                    stats.streak
                );
            }
            "abilities" | "ab" => display_abilities(&rt.block_on(store.snapshot())),
            "key" => {
                if rest.is_empty() {
                    println!("Usage: key <api-key>");
                } else {
                    rt.block_on(store.save_credential(rest))?;
                    println!("API key saved.");
                }
            }
            "welcome" => {
                let credential = rt.block_on(store.credential());
                let message = rt.block_on(
                    coordinator
                        .classifier()
                        .welcome_message(credential.as_deref()),
                );
                println!("{}", message);
            }
            _ => println!("Unknown command. Type `help` for the list."),
        }
    }

    let stats = board.stats();
    println!(
        "\nGoodbye! {} tasks resolved, {} open.",
        stats.total,
        board.current().len()
    );
    Ok(())
}

/// Resolve the n-th open task and classify it in the background
fn resolve(
    rt: &Runtime,
    board: &mut TaskBoard,
    coordinator: &Arc<ProgressionCoordinator>,
    arg: &str,
    resolution: Resolution,
) {
    let Some(task) = nth_task(board, arg) else {
        println!("Usage: done|drop <number from `list`>");
        return;
    };

    let task = match rt.block_on(board.resolve(task.id, resolution)) {
        Ok(task) => task,
        Err(e) => {
            println!("Could not update task: {}", e);
            return;
        }
    };
    match resolution {
        Resolution::Completed => println!("Completed: {}", task.content),
        Resolution::Abandoned => println!("Abandoned: {}", task.content),
    }

    let content = task.content.clone();
    let handle = coordinator.spawn_resolution(task, resolution);
    rt.spawn(async move {
        match handle.await {
            Ok(Ok(_)) => println!("\nAbilities updated for \"{}\" - see `abilities`.", content),
            Ok(Err(TrackerError::MissingCredential)) => {
                println!("\nSet an API key first with `key <api-key>`.")
            }
            Ok(Err(TrackerError::NoScores)) => {
                println!("\nCould not analyze \"{}\": no usable scores.", content)
            }
            Ok(Err(e)) => println!("\nClassification failed for \"{}\": {}", content, e),
            Err(e) => tracing::error!("Resolution task panicked: {}", e),
        }
    });
}

fn nth_task(board: &TaskBoard, arg: &str) -> Option<Task> {
    let n: usize = arg.parse().ok()?;
    board.current().get(n.checked_sub(1)?).cloned()
}

/// Print level-ups as the store publishes them
async fn watch_level_ups(mut updates: broadcast::Receiver<AbilitySet>, mut last: AbilitySet) {
    loop {
        match updates.recv().await {
            Ok(current) => {
                for ability in &current {
                    let before = last.get(ability.name).map_or(1, |a| a.level);
                    if ability.level > before {
                        println!("\n*** {} reached Lv.{}! ***", ability.name.name(), ability.level);
                    }
                }
                last = current;
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::debug!("Level-up watcher skipped {} updates", n);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  add <task>      - Add a task");
    println!("  list / l        - Show open tasks");
    println!("  done <n>        - Complete task n");
    println!("  drop <n>        - Abandon task n");
    println!("  history         - Show resolved tasks");
    println!("  stats           - Show completion stats");
    println!("  abilities / ab  - Show ability levels");
    println!("  key <api-key>   - Save the API key");
    println!("  welcome         - Show a welcome message");
    println!("  quit / q        - Exit");
    println!();
}

fn display_current(board: &TaskBoard) {
    if board.current().is_empty() {
        println!("No open tasks.");
        return;
    }
    for (i, task) in board.current().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, task.content);
    }
}

fn display_history(board: &TaskBoard) {
    println!("Completed:");
    for task in board.completed().iter().take(10) {
        println!("  + {}", task.content);
    }
    println!("Abandoned:");
    for task in board.abandoned().iter().take(10) {
        println!("  - {}", task.content);
    }
}

fn display_abilities(abilities: &AbilitySet) {
    println!();
    for ability in abilities {
        let filled = (ability.progress() * 20.0) as usize;
        println!(
            "  {:<16} {} Lv.{:<3} [{:<20}] {:>2}/{}",
            ability.name.name(),
            ability.name.label(),
            ability.level,
            "#".repeat(filled.min(20)),
            ability.experience as u32,
            EXPERIENCE_PER_LEVEL as u32
        );
    }
    println!("  Total level: {}", abilities.total_level());
    println!();
}
