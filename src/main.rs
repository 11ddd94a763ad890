use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use u_timetable::config::{Settings, StorageBackend};
use u_timetable::models::{ClassSchedule, FacultySchedule, LabSchedule, TimetableKind};
use u_timetable::source::{DataSource, JsonWorkbookSource};
use u_timetable::storage::{BlobStore, FsBlobStore, MemoryBlobStore, TimetableStore};
use u_timetable::{Department, TimetableGenerator};

#[derive(Parser)]
#[command(
    name = "u-timetable",
    version,
    about = "Generate faculty, class and lab timetables from a workbook",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and store all three timetables
    Generate {
        /// Department label, e.g. "2nd Year"
        #[arg(short, long, default_value = Department::DEFAULT)]
        department: String,

        /// Restrict generation to one faculty member
        #[arg(short, long)]
        faculty: Option<String>,
    },

    /// Print a stored timetable
    Show {
        #[arg(short, long, default_value = Department::DEFAULT)]
        department: String,

        #[arg(short, long, value_enum)]
        kind: KindArg,

        #[arg(short, long)]
        faculty: Option<String>,
    },

    /// List department labels found in the workbook
    Departments,

    /// List faculty names found in the workbook
    Faculty,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Faculty,
    Class,
    Lab,
}

impl From<KindArg> for TimetableKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Faculty => TimetableKind::Faculty,
            KindArg::Class => TimetableKind::Class,
            KindArg::Lab => TimetableKind::Lab,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, &cli.log_format);

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let output = run(cli.command, &settings)?;
    println!("{output}");
    Ok(())
}

/// Executes one command and returns what it prints.
fn run(command: Commands, settings: &Settings) -> Result<String> {
    let source = JsonWorkbookSource::new(&settings.source.path);
    let backend: Box<dyn BlobStore> = match settings.storage.backend {
        StorageBackend::Memory => Box::new(MemoryBlobStore::new()),
        StorageBackend::Filesystem => Box::new(FsBlobStore::new(&settings.storage.root)),
    };

    match command {
        Commands::Generate {
            department,
            faculty,
        } => {
            let generator = TimetableGenerator::from_settings(source, backend, settings);
            let report = generator.generate(&Department::new(department), faculty.as_deref());
            Ok(serde_json::to_string_pretty(&report)?)
        }
        Commands::Show {
            department,
            kind,
            faculty,
        } => {
            if !settings.storage.backend.is_persistent() {
                bail!(
                    "`show` reads timetables stored by an earlier run, but the memory backend \
                     keeps nothing between runs; set storage.backend = \"filesystem\""
                );
            }
            let store = TimetableStore::from_config(backend, &settings.storage);
            let department = Department::new(department);
            let faculty = faculty.as_deref();
            let value = match TimetableKind::from(kind) {
                TimetableKind::Faculty => {
                    serde_json::to_value(store.get::<FacultySchedule>(&department, faculty)?)?
                }
                TimetableKind::Class => {
                    serde_json::to_value(store.get::<ClassSchedule>(&department, None)?)?
                }
                TimetableKind::Lab => {
                    serde_json::to_value(store.get::<LabSchedule>(&department, None)?)?
                }
            };
            Ok(serde_json::to_string_pretty(&value)?)
        }
        Commands::Departments => {
            let dataset = source.load().context("Failed to load workbook")?;
            let labels: Vec<String> = dataset.departments().iter().map(|d| d.to_string()).collect();
            Ok(labels.join("\n"))
        }
        Commands::Faculty => {
            let dataset = source.load().context("Failed to load workbook")?;
            Ok(dataset.faculty_names().join("\n"))
        }
    }
}

fn init_logging(verbose: bool, format: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            tracing_subscriber::EnvFilter::new("u_timetable=debug,info")
        } else {
            tracing_subscriber::EnvFilter::new("u_timetable=info,warn")
        }
    });

    // Logs go to stderr so stdout stays machine-readable JSON.
    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
