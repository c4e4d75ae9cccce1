use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use footer_api::config::{Settings, log_path};
use footer_api::store::import::import_file;
use footer_api::store::sqlite::SqliteStore;

#[derive(Parser)]
#[command(name = "footer-api")]
#[command(version, about = "Documentation footer/flyout HTML API")]
struct Cli {
    /// Path to a JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log to the data-directory log file instead of stderr
    #[arg(long, global = true)]
    log_to_file: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Seed the registry from a JSON fixture
    Import {
        /// Fixture file with projects and their versions
        #[arg(long)]
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_to_file)?;

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match cli.command {
        None | Some(Command::Serve) => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(footer_api::api::server::run_server(settings)),
        Some(Command::Import { file }) => {
            let store = SqliteStore::new(&settings.database_path())?;
            let (projects, versions) = import_file(&store, &file)?;
            println!("Imported {projects} projects and {versions} versions");
            Ok(())
        }
    }
}

fn init_tracing(log_to_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if log_to_file {
        let path = log_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let (writer, guard) = tracing_appender::non_blocking(open_log_file(&path)?);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        Ok(None)
    }
}

fn open_log_file(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::OpenOptions::new().create(true).append(true).open(path)
}
