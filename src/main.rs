mod cli;
mod commands;
mod mcp;
mod pagination;
mod select;
mod session;
mod store;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use store::DocumentStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut store = DocumentStore::open(&cli.store)?;

    match cli.command {
        Commands::Mcp => {
            mcp::run_server(store).await?;
        }
        Commands::Ls => {
            commands::ls::run(&store);
        }
        Commands::Add { path, name } => {
            commands::add::run(&mut store, &path, name.as_deref())?;
        }
        Commands::Pages { id, batch_size } => {
            commands::pages::run(&store, &id, batch_size)?;
        }
        Commands::Slice { id, pattern, pages } => {
            commands::slice::run(&mut store, &id, pattern.as_deref(), &pages)?;
        }
        Commands::Merge { ids, name } => {
            commands::merge::run(&mut store, &ids, name.as_deref())?;
        }
        Commands::Rotate { id, pages, angle } => {
            commands::rotate::run(&mut store, &id, &pages, angle)?;
        }
        Commands::Rm { id } => {
            commands::rm::run(&mut store, &id)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    // Logs go to stderr so MCP stdio framing stays clean.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
