use clap::{Parser, Subcommand};
use jobboard::cli::{self as prog_cli, Command, OutputMode, Response};
use jobboard::config::AppConfig;
use jobboard::errors::DbError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jobboard", version, about = "Job postings: list, search and manage", long_about = None)]
struct Cli {
    #[arg(long, global = true, help = "Path to a config file (TOML). Falls back to $JOBBOARD_CONFIG, then ./jobboard.toml.")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override the store's write-ahead log path. Takes precedence over config/env.")]
    db: Option<PathBuf>,
    #[arg(long, global = true, default_value = "human", help = "Output format: human|plain|json")]
    format: String,
    #[arg(long, global = true, help = "Log level: off|error|warn|info|debug|trace")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "List jobs, narrowed by a query string (e.g. \"salary[gte]=80000&sort=-postingDate&page=2\")")]
    Jobs {
        #[arg(long, help = "URL-style query string; a leading '?' is allowed")]
        query: Option<String>,
    },
    #[command(name = "jobs-radius", about = "List jobs within DISTANCE miles of ZIPCODE")]
    JobsRadius {
        #[arg(help = "Zipcode to search around")]
        zipcode: String,
        #[arg(help = "Distance in miles")]
        distance: f64,
    },
    #[command(name = "jobs-stats", about = "Salary and position stats per experience level for a topic")]
    JobsStats {
        #[arg(help = "Words to search for in title and description")]
        topic: String,
    },
    #[command(name = "job-get", about = "Show one job by id and slug")]
    JobGet {
        #[arg(help = "Job id")]
        id: String,
        #[arg(help = "Job slug")]
        slug: String,
    },
    #[command(name = "job-new", about = "Create a job from a JSON file")]
    JobNew {
        #[arg(long, help = "Path to the job JSON")]
        file: PathBuf,
    },
    #[command(name = "job-update", about = "Update a job's fields from a JSON file")]
    JobUpdate {
        #[arg(help = "Job id")]
        id: String,
        #[arg(long, help = "Path to the JSON patch")]
        file: PathBuf,
    },
    #[command(name = "job-delete", about = "Delete a job")]
    JobDelete {
        #[arg(help = "Job id")]
        id: String,
    },
}

impl From<Commands> for Command {
    fn from(c: Commands) -> Self {
        match c {
            Commands::Jobs { query } => Self::ListJobs { query },
            Commands::JobsRadius { zipcode, distance } => Self::JobsInRadius { zipcode, distance },
            Commands::JobsStats { topic } => Self::JobStats { topic },
            Commands::JobGet { id, slug } => Self::GetJob { id, slug },
            Commands::JobNew { file } => Self::NewJob { file },
            Commands::JobUpdate { id, file } => Self::UpdateJob { id, file },
            Commands::JobDelete { id } => Self::DeleteJob { id },
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig, DbError> {
    let mut cfg = AppConfig::load(cli.config.as_deref())?;
    if let Some(db) = &cli.db {
        cfg.db_path = Some(db.clone());
    }
    if let Some(level) = &cli.log_level {
        cfg.log_level = Some(level.clone());
    }
    Ok(cfg)
}

fn init_logging(cfg: &AppConfig) {
    let res = if cfg.log_dir.is_some() || cfg.log_level.is_some() {
        jobboard::logger::configure_logging(cfg.log_dir.as_deref(), cfg.log_level.as_deref(), None, false)
    } else if std::env::var_os("JOBBOARD_LOG_DIR").is_some() {
        jobboard::logger::configure_from_env()
    } else {
        Ok(())
    };
    if let Err(e) = res {
        eprintln!("warning: logging disabled: {e}");
    }
}

fn fail(err: &DbError, mode: OutputMode) -> ! {
    let resp = Response::failure(err);
    match mode {
        OutputMode::Json => println!("{}", prog_cli::render(&resp, mode)),
        _ => eprintln!("error: {}", resp.message),
    }
    std::process::exit(prog_cli::exit_code(err));
}

fn main() {
    let cli = Cli::parse();
    let mode = prog_cli::parse_output_mode(Some(&cli.format));
    let cfg = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => fail(&e, mode),
    };
    init_logging(&cfg);
    let service = match jobboard::open(&cfg) {
        Ok(s) => s,
        Err(e) => fail(&e, mode),
    };
    if let Err(e) = prog_cli::run_with_format(&service, cli.command.into(), mode) {
        fail(&e, mode);
    }
}
