//! crewplan CLI - skill-aware task assignment for small teams.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crewplan_assign::Summary;
use crewplan_core::{
    Error as RosterError, Priority, ProjectDraft, Task, TaskId, TaskPatch, Worker, WorkerId, WorkerPatch,
};
use crewplan_storage::{JsonStorage, StorageError};
use crewplan_work::{ManagerConfig, RosterManager};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crewplan")]
#[command(about = "Skill-aware task assignment for small teams", long_about = None)]
struct Cli {
    /// Storage directory for roster data
    #[arg(short, long, env = "CREWPLAN_STORAGE", default_value = ".crewplan", global = true)]
    storage: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the storage directory
    Init {
        /// Seed an empty roster with a starter project
        #[arg(long)]
        sample: bool,
    },
    /// Manage workers
    #[command(subcommand)]
    Worker(WorkerCommand),
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Reassign every open task from scratch
    Assign,
    /// Manually assign a task (omit the worker to unassign)
    Reassign {
        /// Task ID
        task: String,
        /// Worker ID
        worker: Option<String>,
    },
    /// Show progress and assignments
    Status,
    /// Replace the roster with a generated project draft (JSON)
    Import {
        /// Path to the draft payload
        file: PathBuf,
        /// Run a full assignment after importing
        #[arg(long)]
        assign: bool,
    },
}

#[derive(Subcommand)]
enum WorkerCommand {
    /// Add a worker
    Add {
        /// Name
        name: String,
        /// Role
        #[arg(long, default_value = "")]
        role: String,
        /// Comma-separated skills
        #[arg(long, value_delimiter = ',')]
        skills: Vec<String>,
        /// Max open tasks
        #[arg(long, default_value = "5")]
        capacity: u32,
    },
    /// List workers
    List,
    /// Update a worker
    Update {
        /// Worker ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New role
        #[arg(long)]
        role: Option<String>,
        /// Replacement comma-separated skills
        #[arg(long, value_delimiter = ',')]
        skills: Option<Vec<String>>,
        /// New capacity
        #[arg(long)]
        capacity: Option<u32>,
    },
    /// Remove a worker and unassign its tasks
    Remove {
        /// Worker ID
        id: String,
    },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Add a task
    Add {
        /// Title
        title: String,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
        /// Comma-separated required skills
        #[arg(long, value_delimiter = ',')]
        skills: Vec<String>,
        /// Priority (low, medium, high)
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
    /// List tasks
    List {
        /// Only open tasks without a worker
        #[arg(long)]
        unassigned: bool,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// Replacement comma-separated required skills
        #[arg(long, value_delimiter = ',')]
        skills: Option<Vec<String>>,
        /// New priority
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Remove a task
    Remove {
        /// Task ID
        id: String,
    },
    /// Toggle a task's completion
    Toggle {
        /// Task ID
        id: String,
    },
}

fn init_logging() {
    // Logs go to stderr so listings on stdout stay clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    if let Commands::Init { sample } = cli.command {
        let storage = JsonStorage::new(&cli.storage).await?;
        info!("Initialized storage at {}", storage.root().display());
        if sample {
            let manager = RosterManager::new(storage);
            match manager.seed_sample().await? {
                Some(roster) => println!(
                    "Seeded {} workers and {} tasks",
                    roster.workers().len(),
                    roster.tasks().len()
                ),
                None => println!("Roster already has data; sample not added"),
            }
        }
        return Ok(());
    }

    let storage = match JsonStorage::open(&cli.storage).await {
        Err(StorageError::NotFound(path)) => {
            anyhow::bail!("No roster at {}; run `crewplan init` first", path)
        }
        other => other?,
    };

    match cli.command {
        Commands::Init { .. } => unreachable!("handled above"),
        Commands::Worker(cmd) => run_worker(RosterManager::new(storage), cmd).await?,
        Commands::Task(cmd) => run_task(RosterManager::new(storage), cmd).await?,
        Commands::Assign => {
            let manager = RosterManager::new(storage);
            let report = manager.assign_all().await?;
            println!("Assigned {} task(s)", report.placed);
            if !report.unassigned.is_empty() {
                let roster = manager.snapshot().await?;
                println!("No eligible worker for {} task(s):", report.unassigned.len());
                for id in &report.unassigned {
                    if let Some(task) = roster.task(*id) {
                        println!("  {} | {}", task.id, task.title);
                    }
                }
            }
        }
        Commands::Reassign { task, worker } => {
            let manager = RosterManager::new(storage);
            let task_id = parse_id::<TaskId>(&task)?;
            let worker_id = worker.as_deref().map(parse_id::<WorkerId>).transpose()?;

            let outcome = manager.reassign(task_id, worker_id).await?;
            match (outcome.changed(), outcome.current) {
                (false, _) => println!("No change"),
                (true, Some(w)) => println!("Task {} assigned to {}", task_id, w),
                (true, None) => println!("Task {} unassigned", task_id),
            }
        }
        Commands::Status => {
            let manager = RosterManager::new(storage);
            let roster = manager.snapshot().await?;
            let summary = Summary::of(roster.workers(), roster.tasks());
            print_status(&summary, roster.workers(), roster.tasks());
        }
        Commands::Import { file, assign } => {
            let json = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let draft = ProjectDraft::from_json(&json)?;

            let manager = RosterManager::new(storage).with_config(ManagerConfig {
                auto_assign_on_import: assign,
                ..Default::default()
            });
            let roster = manager.import_draft(draft).await?;
            println!(
                "Created {} workers and {} tasks",
                roster.workers().len(),
                roster.tasks().len()
            );
        }
    }

    Ok(())
}

async fn run_worker(manager: RosterManager<JsonStorage>, cmd: WorkerCommand) -> Result<()> {
    match cmd {
        WorkerCommand::Add { name, role, skills, capacity } => {
            let worker = manager.add_worker(Worker::new(name, role, skills, capacity)).await?;
            println!("Added worker: {} - {}", worker.id, worker.name);
        }
        WorkerCommand::List => {
            let roster = manager.snapshot().await?;
            println!("Workers ({})", roster.workers().len());
            for w in roster.workers() {
                println!(
                    "  {} | {:<20} | {}/{} | {}",
                    w.id,
                    w.name,
                    w.current_workload,
                    w.workload_capacity,
                    join(&w.skills),
                );
            }
        }
        WorkerCommand::Update { id, name, role, skills, capacity } => {
            let patch = WorkerPatch {
                name,
                role,
                skills: skills.map(|s| s.into_iter().collect()),
                workload_capacity: capacity,
            };
            if patch.is_empty() {
                println!("Nothing to update");
                return Ok(());
            }
            let worker = manager.update_worker(parse_id(&id)?, patch).await?;
            println!("Updated worker: {} - {}", worker.id, worker.name);
        }
        WorkerCommand::Remove { id } => {
            let worker = manager.remove_worker(parse_id(&id)?).await?;
            println!("Removed worker: {} - {}", worker.id, worker.name);
        }
    }
    Ok(())
}

async fn run_task(manager: RosterManager<JsonStorage>, cmd: TaskCommand) -> Result<()> {
    match cmd {
        TaskCommand::Add { title, description, skills, priority } => {
            let task = manager.add_task(Task::new(title, description, skills, priority)).await?;
            println!("Added task: {} - {}", task.id, task.title);
        }
        TaskCommand::List { unassigned } => {
            let roster = manager.snapshot().await?;
            let tasks: Vec<&Task> = roster
                .tasks()
                .iter()
                .filter(|t| !unassigned || (!t.completed && t.assigned_to.is_none()))
                .collect();

            println!("Tasks ({})", tasks.len());
            for task in tasks {
                let owner = task
                    .assigned_to
                    .and_then(|id| roster.worker(id))
                    .map(|w| w.name.as_str())
                    .unwrap_or("-");
                println!(
                    "  {} | {} | {:<6} | {:<16} | {}",
                    task.id,
                    if task.completed { "x" } else { " " },
                    task.priority,
                    owner,
                    task.title,
                );
            }
        }
        TaskCommand::Update { id, title, description, skills, priority } => {
            let patch = TaskPatch {
                title,
                description,
                required_skills: skills.map(|s| s.into_iter().collect()),
                priority,
            };
            if patch.is_empty() {
                println!("Nothing to update");
                return Ok(());
            }
            let task = manager.update_task(parse_id(&id)?, patch).await?;
            println!("Updated task: {} - {}", task.id, task.title);
        }
        TaskCommand::Remove { id } => {
            let task = manager.remove_task(parse_id(&id)?).await?;
            println!("Removed task: {} - {}", task.id, task.title);
        }
        TaskCommand::Toggle { id } => {
            let id = parse_id(&id)?;
            let completed = manager.toggle_completion(id).await?;
            println!("Task {} {}", id, if completed { "completed" } else { "reopened" });
        }
    }
    Ok(())
}

fn print_status(summary: &Summary, workers: &[Worker], tasks: &[Task]) {
    println!("Project Progress");
    println!(
        "  {} of {} tasks completed ({:.0}%)",
        summary.completed,
        summary.total,
        summary.percent_complete()
    );
    println!("  {} assigned, {} unassigned", summary.assigned, summary.unassigned);
    if summary.all_distributed {
        println!("  All tasks are distributed");
    }

    for (worker, held) in Summary::by_worker(workers, tasks) {
        let flag = if worker.is_over_capacity() { " (over capacity)" } else { "" };
        println!(
            "{} - {} [{}/{}]{}",
            worker.name, worker.role, worker.current_workload, worker.workload_capacity, flag
        );
        for task in held {
            println!(
                "  [{}] {} ({})",
                if task.completed { "x" } else { " " },
                task.title,
                task.priority
            );
        }
    }

    let waiting: Vec<&Task> = tasks
        .iter()
        .filter(|t| !t.completed && t.assigned_to.is_none())
        .collect();
    if !waiting.is_empty() {
        println!("Unassigned");
        for task in waiting {
            println!("  {} | {} ({}) needs {}", task.id, task.title, task.priority, join(&task.required_skills));
        }
    }
}

fn parse_id<T: std::str::FromStr>(s: &str) -> Result<T, RosterError> {
    s.parse().map_err(|_| RosterError::InvalidId(s.to_string()))
}

fn join(skills: &BTreeSet<String>) -> String {
    skills.iter().cloned().collect::<Vec<_>>().join(", ")
}
