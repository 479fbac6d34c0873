use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use std::path::PathBuf;
use tasklist::{Applied, Config, StatusFilter, TaskDraft, TaskStore, display, parse_deadline};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Task list manager - add, edit, complete, delete and filter tasks")]
#[command(version)]
struct Cli {
    /// Path to a tasklist.yml config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the task list (overrides the config file)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new pending task
    Add {
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Local date-time, e.g. 2026-10-20T09:00
        #[arg(long, default_value = "", value_parser = deadline_arg)]
        deadline: String,
    },

    /// Change a task's title, description or deadline
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Local date-time, or an empty string to clear it
        #[arg(long, value_parser = deadline_arg)]
        deadline: Option<String>,
    },

    /// Mark a task completed, or pending again
    Toggle { id: String },

    /// Delete a task
    Delete { id: String },

    /// List tasks
    List {
        #[arg(short, long, default_value = "all")]
        filter: StatusFilter,
    },
}

/// Accept an empty string or a datetime-local value
fn deadline_arg(s: &str) -> Result<String, String> {
    if s.is_empty() || parse_deadline(s).is_some() {
        Ok(s.to_string())
    } else {
        Err(format!("invalid deadline: {} (expected YYYY-MM-DDTHH:MM)", s))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.store_path {
        config.storage.path = Some(path);
    }

    let mut store = config.storage.open_store()?;
    run(&mut store, cli.command)
}

fn run(store: &mut TaskStore, command: Commands) -> Result<()> {
    match command {
        Commands::Add {
            title,
            description,
            deadline,
        } => {
            let draft = TaskDraft::new(title).description(description).deadline(deadline);
            let applied = store.add(draft)?;
            println!("Added task {}", applied.value);
            warn_unsaved(&applied);
        }
        Commands::Edit {
            id,
            title,
            description,
            deadline,
        } => {
            let mut draft = store.start_editing(&id)?;
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(deadline) = deadline {
                draft.deadline = deadline;
            }
            let applied = store.submit(draft)?;
            println!("Updated task {}", applied.value);
            warn_unsaved(&applied);
        }
        Commands::Toggle { id } => {
            let applied = store.toggle_status(&id)?;
            println!("Task {} is now {}", id, applied.value);
            warn_unsaved(&applied);
        }
        Commands::Delete { id } => {
            let applied = store.delete(&id)?;
            println!("Deleted task {} ({})", id, applied.value.title);
            warn_unsaved(&applied);
        }
        Commands::List { filter } => {
            store.set_filter(filter);
            let now = Local::now().naive_local();
            println!("{}", display::render_list(&store.visible(), store.filter(), now));
        }
    }

    Ok(())
}

fn warn_unsaved<T>(applied: &Applied<T>) {
    if let Some(e) = &applied.flush_error {
        eprintln!("{} changes were not saved: {:#}", "warning:".yellow().bold(), e);
    }
}
