use crate::server;
use clap::{Args, Parser, Subcommand};
use prestabanco::config::AppConfig;
use prestabanco::error::AppError;
use prestabanco::lending::DocumentRequirements;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "PrestaBanco",
    about = "Run the loan application document service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the effective document requirement table as JSON
    Requirements(RequirementsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RequirementsArgs {
    /// Read the table from this file instead of the environment configuration
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Requirements(args) => print_requirements(args),
    }
}

fn print_requirements(args: RequirementsArgs) -> Result<(), AppError> {
    let requirements = match args.file {
        Some(path) => DocumentRequirements::load(&path)?,
        None => AppConfig::load()?.lending.requirements,
    };
    let rendered = serde_json::to_string_pretty(&requirements)
        .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))?;
    println!("{rendered}");
    Ok(())
}
