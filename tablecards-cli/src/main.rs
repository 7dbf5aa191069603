//! tablecards - command line access to a table-storage backend

use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Parser;
use clap::Subcommand;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;
use tablecards_lib::TableCardsClient;
use tablecards_lib::auth::SessionTokenProvider;
use tablecards_lib::auth::StaticTokenProvider;
use tablecards_lib::auth::TokenProvider;
use tablecards_lib::error::ApiError;
use tablecards_lib::model::CellCord;
use tablecards_lib::service::LogNotifier;
use tablecards_lib::service::TableService;
use tablecards_lib::session::Session;
use tablecards_lib::session::SessionContext;
use tablecards_lib::session::SqliteStorage;

#[derive(Parser)]
#[command(name = "tablecards")]
#[command(version)]
#[command(about = "Browse and manage tables on a table-storage backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL
    #[arg(long, env = "TABLECARDS_URL", global = true)]
    url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "TABLECARDS_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Session database; when set, the token is read from the stored session
    #[arg(long, global = true)]
    session_db: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List tables
    Tables,

    /// Create an empty table
    CreateTable {
        /// Table name
        name: String,
    },

    /// Rename a table
    RenameTable {
        /// Table id
        id: String,
        /// New name
        name: String,
    },

    /// Delete a table and its content
    DeleteTable {
        /// Table id
        id: String,
    },

    /// Print a table as a grid
    Show {
        /// Table id
        table_id: String,
    },

    /// List the data types a column can have
    DataTypes {
        /// Filter by name
        #[arg(default_value = "")]
        term: String,
    },

    /// Store a token in the session database
    Login {
        /// Access token
        token: String,

        /// Email the token belongs to
        #[arg(long)]
        email: Option<String>,
    },

    /// Remove the stored session
    Logout,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("Error: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    match log_file {
        Some(path) => WriteLogger::init(level, Config::default(), File::create(path)?)?,
        None => TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?,
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Commands::Login { token, email } => {
            let context = session_context(&cli).await?;
            let mut session = Session::new(token.clone());
            if let Some(email) = email {
                session = session.email(email.clone());
            }
            context.store_session(&session).await?;
            println!("Session stored");
            return Ok(());
        }
        Commands::Logout => {
            session_context(&cli).await?.clear_session().await?;
            println!("Signed out");
            return Ok(());
        }
        _ => {}
    }

    let client = connect(&cli).await?;

    match cli.command {
        Commands::Tables => {
            for card in client.table_cards().await? {
                println!("{}\t{}", card.id, card.name);
            }
        }
        Commands::CreateTable { name } => {
            let card = client.create_table_card(name).await?;
            println!("{}\t{}", card.id, card.name);
        }
        Commands::RenameTable { id, name } => {
            let card = client.rename_table_card(&id, name).await?;
            println!("{}\t{}", card.id, card.name);
        }
        Commands::DeleteTable { id } => {
            client.delete_table_card(&id).await?;
            println!("Deleted {}", id);
        }
        Commands::Show { table_id } => {
            let mut service = TableService::new(Arc::new(client)).with_notifier(LogNotifier);
            service.init(table_id).await?;
            print!("{}", render_grid(&service));
        }
        Commands::DataTypes { term } => {
            for data_type in client.data_types(&term).await? {
                println!("{}\t{}\t{}", data_type.id(), data_type.name(), data_type.icon());
            }
        }
        Commands::Login { .. } | Commands::Logout => {}
    }
    Ok(())
}

async fn session_context(cli: &Cli) -> Result<SessionContext, Box<dyn Error>> {
    let path = cli
        .session_db
        .as_deref()
        .ok_or("no session database; pass --session-db")?;
    Ok(SessionContext::new(SqliteStorage::open(path).await?))
}

async fn connect(cli: &Cli) -> Result<TableCardsClient, Box<dyn Error>> {
    let url = cli
        .url
        .clone()
        .ok_or("no backend URL; pass --url or set TABLECARDS_URL")?;

    let client = if cli.session_db.is_some() {
        build_client(url, SessionTokenProvider::new(session_context(cli).await?))?
    } else {
        let token = cli
            .token
            .clone()
            .ok_or("no token; pass --token, set TABLECARDS_TOKEN or use --session-db")?;
        build_client(url, StaticTokenProvider::new(token))?
    };
    Ok(client)
}

fn build_client(url: String, provider: impl TokenProvider + 'static) -> Result<TableCardsClient, ApiError> {
    TableCardsClient::builder().url(url).token_provider(provider).build()
}

/// Formats the loaded table as aligned text, header first.
fn render_grid(service: &TableService) -> String {
    let columns = service.header_columns();
    let header: Vec<String> = columns
        .iter()
        .map(|column| format!("{} ({})", column.name(), column.data_type()))
        .collect();
    let body: Vec<Vec<String>> = (0..service.rows().len())
        .map(|row| {
            (0..columns.len())
                .map(|column| {
                    service
                        .cell(CellCord::body(row, column))
                        .map(|cell| cell.display_value())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..columns.len())
        .map(|i| {
            body.iter()
                .map(|line| line[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let mut push_line = |cells: &[String]| {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');
    };

    push_line(&header);
    push_line(&widths.iter().map(|width| "-".repeat(*width)).collect::<Vec<_>>());
    for line in &body {
        push_line(line);
    }
    out
}
