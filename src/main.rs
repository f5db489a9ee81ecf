use clap::{Parser, Subcommand};

mod tui;

#[derive(Parser)]
#[command(name = "taskboard", about = "Minimal task tracker: REST server and terminal UI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the REST API server
    Serve {
        /// Listen port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Open the terminal UI against a running server
    Ui {
        /// API base URL (overrides TASKBOARD_API_URL)
        #[arg(long)]
        api_url: Option<String>,
    },
    /// Create the tasks schema in the configured database
    InitDb,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => serve(port),
        Command::Ui { api_url } => {
            let url = api_url
                .or_else(|| std::env::var("TASKBOARD_API_URL").ok())
                .unwrap_or_else(|| taskboard_client::DEFAULT_API_URL.to_string());
            tui::run(&url)
        }
        Command::InitDb => init_db(),
    }
}

fn serve(port_flag: Option<u16>) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL").ok();
    let port = port_flag
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or_else(|| taskboard_server::ServerConfig::default().port);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let store = taskboard_store::open_store(database_url.as_deref())?;
        let handle = taskboard_server::start(taskboard_server::ServerConfig { port }, store).await?;
        tracing::info!(port = handle.port, "taskboard ready");

        tokio::signal::ctrl_c().await?;
        tracing::info!("shutting down");
        Ok(())
    })
}

/// Idempotent schema initialization: opening the database applies the
/// create-if-missing DDL.
fn init_db() -> anyhow::Result<()> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        anyhow::bail!("DATABASE_URL is not set; nothing to initialize");
    };
    let path = database_url
        .strip_prefix("sqlite://")
        .unwrap_or(&database_url);

    let db = taskboard_store::Database::open(std::path::Path::new(path))?;
    println!("tasks schema ready at {}", db.path().display());
    Ok(())
}
