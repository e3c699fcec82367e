use std::sync::Arc;

use anyhow::{anyhow, Result};
use catalog_core::{
    CatalogController, ConfirmationGate, DeleteOutcome, FixedConfirmation, HttpCatalogClient,
    InputKey, ManagerConfig, ManagerError, MasterListManager, SaveOutcome,
};
use clap::{Parser, Subcommand};
use shared::domain::{CatalogId, CatalogItem, CatalogKind};
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::load_settings;
use console::{prompt_line, ConsoleNotifier, StdinConfirmation};

#[derive(Parser, Debug)]
#[command(name = "catalog_admin", about = "Maintain the clinic's catalog master lists")]
struct Args {
    /// API root, e.g. http://localhost:8000/api/
    #[arg(long)]
    api_url: Option<String>,
    /// obras-sociales, antecedentes, analisis-funcional or tratamientos
    #[arg(long, value_parser = parse_catalog)]
    catalog: Option<CatalogKind>,
    /// Skip the delete confirmation prompt.
    #[arg(long, short = 'y')]
    yes: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    /// Prompts for the name when it is not given.
    Add { name: Option<String> },
    /// Prompts for the new name when it is not given; an empty answer keeps
    /// the current one.
    Edit { id: String, name: Option<String> },
    Delete { id: String },
}

fn parse_catalog(raw: &str) -> Result<CatalogKind, String> {
    CatalogKind::parse(raw).ok_or_else(|| format!("unknown catalog '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let settings = load_settings();

    let api_url = args.api_url.unwrap_or(settings.api_url.clone());
    let kind = args.catalog.unwrap_or(settings.default_catalog);
    let remote = Arc::new(HttpCatalogClient::new(
        &api_url,
        kind,
        settings.request_timeout(),
    )?);
    let controller = Arc::new(CatalogController::for_kind(
        kind,
        remote,
        Arc::new(ConsoleNotifier),
    ));
    controller
        .reload()
        .await
        .map_err(|err| anyhow!(err.user_message("load", controller.label())))?;

    let gate: Arc<dyn ConfirmationGate> = if args.yes {
        Arc::new(FixedConfirmation(true))
    } else {
        Arc::new(StdinConfirmation)
    };
    let manager = MasterListManager::new(controller.clone(), gate, ManagerConfig::for_kind(kind));

    match args.command {
        Command::List => print_list(kind, &manager.items().await),
        Command::Add { name } => {
            let name = resolve_name(&manager, name).await?;
            enter_name(&manager, &name).await;
            commit(&manager).await?;
        }
        Command::Edit { id, name } => {
            finish(manager.start_edit(&CatalogId::parse(&id)).await)?;
            let name = resolve_name(&manager, name).await?;
            enter_name(&manager, &name).await;
            commit(&manager).await?;
        }
        Command::Delete { id } => {
            match finish(manager.request_delete(&CatalogId::parse(&id)).await)? {
                DeleteOutcome::Deleted(_) => {}
                DeleteOutcome::Declined => println!("Nothing deleted."),
            }
        }
    }

    Ok(())
}

fn print_list(kind: CatalogKind, items: &[CatalogItem]) {
    if items.is_empty() {
        println!("No {} entries in the list.", kind.label());
        return;
    }
    for item in items {
        println!("{:>6}  {}", item.id.to_string(), item.name);
    }
}

async fn resolve_name(manager: &MasterListManager, given: Option<String>) -> Result<String> {
    if let Some(name) = given {
        return Ok(name);
    }
    let current = manager.snapshot().await.input;
    let answer = prompt_line(&name_prompt(manager.config(), &current)).await?;
    if answer.trim().is_empty() {
        return Ok(current);
    }
    Ok(answer)
}

fn name_prompt(config: &ManagerConfig, current: &str) -> String {
    if current.is_empty() {
        format!("{}: ", config.placeholder)
    } else {
        format!("{} [{current}]: ", config.placeholder)
    }
}

async fn enter_name(manager: &MasterListManager, name: &str) {
    let change = manager.change_input(name).await;
    if change.dropped > 0 {
        eprintln!(
            "warning: ignored {} character(s); names allow letters, digits, spaces, '.', '-' and ':' up to 40 characters",
            change.dropped
        );
    }
}

async fn commit(manager: &MasterListManager) -> Result<SaveOutcome> {
    let handled = finish(manager.handle_key(InputKey::Commit).await)?;
    handled
        .saved
        .ok_or_else(|| anyhow!("commit key did not save"))
}

/// The controller already reported remote failures through the notifier.
fn finish<T>(result: Result<T, ManagerError>) -> Result<T> {
    result.map_err(|err| match err {
        ManagerError::Remote(_) => anyhow!("catalog request failed"),
        other => anyhow::Error::new(other),
    })
}
