//! Starsign Engine - command line entry point.
//!
//! Runs the lifecycle against the pack files on disk, with no host attached.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use starsign_engine::app::{App, Repositories};
use starsign_engine::infrastructure::{
    app_settings::{settings_metadata, StarsignSettings},
    clock::SystemRandom,
    memory::{InMemoryCharacters, InMemoryTables},
    notifier::TracingNotifier,
    packs::{summarize, PackDirectory},
    ports::{CompendiumRepo, PackKind},
};
use starsign_engine::use_cases::tables::option_names;

const USAGE: &str = "\
Usage: starsign-engine <command>

Commands:
  options    List the configured table's entries as picker options
  draw       Resolve the configured table and draw once
  packs      List the packs found in the pack directory
  settings   Print the settings metadata as JSON

Environment:
  STARSIGN_PACKS_DIR   Pack directory (default: packs)
  STARSIGN_*           Settings overrides, see `settings`";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "starsign_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(command) = std::env::args().nth(1) else {
        println!("{USAGE}");
        return Ok(());
    };

    if command == "settings" {
        println!("{}", serde_json::to_string_pretty(&settings_metadata())?);
        return Ok(());
    }

    let settings = StarsignSettings::from_env();
    let packs_dir = std::env::var("STARSIGN_PACKS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("packs"));
    tracing::info!(packs_dir = %packs_dir.display(), table = %settings.table_name(), "Starting");

    let packs = PackDirectory::open(&packs_dir)
        .await
        .with_context(|| format!("opening pack directory {}", packs_dir.display()))?
        .with_default_uses(settings.default_uses);
    let app = build_app(packs, settings);

    match command.as_str() {
        "options" => {
            let table_name = app.settings.table_name();
            let resolved = app
                .use_cases
                .resolve
                .execute(table_name)
                .await?
                .with_context(|| format!("RollTable \"{table_name}\" not found"))?;
            for name in option_names(&resolved.table) {
                println!("{name}");
            }
        }
        "draw" => {
            let table_name = app.settings.table_name();
            let resolved = app
                .use_cases
                .resolve
                .execute(table_name)
                .await?
                .with_context(|| format!("RollTable \"{table_name}\" not found"))?;
            let entry = app
                .use_cases
                .draw
                .execute(&resolved.table)
                .await?
                .with_context(|| format!("RollTable \"{table_name}\" is empty"))?;
            println!("{}", entry.name());
        }
        "packs" => {
            let mut all = app.repositories.compendium.list_packs(PackKind::RollTable).await?;
            all.extend(app.repositories.compendium.list_packs(PackKind::Item).await?);
            for (kind, ids) in summarize(&all) {
                println!("{kind:?}: {}", ids.join(", "));
            }
        }
        other => bail!("unknown command `{other}`\n\n{USAGE}"),
    }

    Ok(())
}

fn build_app(packs: PackDirectory, settings: StarsignSettings) -> App {
    let characters = Arc::new(InMemoryCharacters::new());
    let repositories = Repositories {
        character: characters.clone(),
        effect: characters,
        table: Arc::new(InMemoryTables::new(Arc::new(SystemRandom::new()))),
        compendium: Arc::new(packs),
    };
    App::new(repositories, Arc::new(TracingNotifier::new()), settings)
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
