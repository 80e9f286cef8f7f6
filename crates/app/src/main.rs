//! Arbor - Main Entry Point
//!
//! Opens a collection directory, applies one structural change and writes it
//! back through the file system persistence adapter.

mod cli;
mod lookup;
mod render;
mod settings;

use anyhow::{Context, bail};
use arbor_application::ports::PersistenceCollaborator;
use arbor_application::{CollectionSession, OpenCollection};
use arbor_domain::Outcome;
use arbor_infrastructure::{FileSystemPersistence, TokioFileSystem};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::lookup::{resolve_item, resolve_parent};
use crate::render::render_tree;
use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let root = cli
        .collection
        .to_str()
        .context("collection path is not valid UTF-8")?
        .to_string();
    let store = FileSystemPersistence::new(TokioFileSystem::new());

    if let Command::Init { name } = &cli.command {
        let collection = store.init_collection(&root, name).await?;
        println!("initialized {} at {}", collection.name, collection.pathname);
        return Ok(());
    }

    let settings = Settings::load(&cli.collection, &cli.overrides())?;
    tracing::debug!(?settings, "configuration loaded");

    let mut session = OpenCollection::new(store, settings.sync)
        .execute(&root)
        .await
        .with_context(|| format!("failed to open collection at {root}"))?;

    let action = command_name(&cli.command);
    match apply(&mut session, cli.command).await? {
        Some(Outcome::Applied) => println!("{action}: done"),
        Some(Outcome::Unchanged) => println!("{action}: nothing to change"),
        None => {}
    }
    Ok(())
}

/// Runs one command against an open session. `None` means nothing was mutated.
async fn apply<P: PersistenceCollaborator>(
    session: &mut CollectionSession<P>,
    command: Command,
) -> anyhow::Result<Option<Outcome>> {
    let outcome = match command {
        Command::Tree { uids } => {
            print!("{}", render_tree(session.tree(), uids));
            return Ok(None);
        }
        Command::Move { dragged, target } => {
            let dragged = resolve_item(session.tree(), &dragged)?;
            let target = resolve_item(session.tree(), &target)?;
            session.move_item(&dragged, &target).await?
        }
        Command::MoveRoot { item } => {
            let uid = resolve_item(session.tree(), &item)?;
            session.move_item_to_root(&uid).await?
        }
        Command::Clone {
            item,
            name,
            filename,
        } => {
            let uid = resolve_item(session.tree(), &item)?;
            session.clone_item(&uid, &name, &filename).await?
        }
        Command::Rename {
            item,
            name,
            filename,
        } => {
            if name.is_none() && filename.is_none() {
                bail!("rename needs --name and/or --filename");
            }
            let uid = resolve_item(session.tree(), &item)?;
            session
                .rename_item(&uid, name.as_deref(), filename.as_deref())
                .await?
        }
        Command::Delete { item } => {
            let uid = resolve_item(session.tree(), &item)?;
            session.delete_item(&uid).await?
        }
        Command::NewRequest {
            name,
            filename,
            parent,
            payload,
        } => {
            let parent = resolve_parent(session.tree(), parent.as_deref())?;
            let payload = match payload {
                Some(raw) => serde_json::from_str(&raw).context("payload is not valid JSON")?,
                None => serde_json::Value::Null,
            };
            session
                .create_request(parent.as_deref(), &name, &filename, payload)
                .await?
        }
        Command::NewFolder {
            name,
            directory,
            parent,
        } => {
            let parent = resolve_parent(session.tree(), parent.as_deref())?;
            session
                .create_folder(parent.as_deref(), &name, &directory)
                .await?
        }
        Command::Resequence { parent } => {
            let parent = resolve_parent(session.tree(), parent.as_deref())?;
            session.resequence(parent.as_deref()).await?
        }
        Command::Init { .. } => bail!("collection is already open"),
    };
    Ok(Some(outcome))
}

const fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Tree { .. } => "tree",
        Command::Move { .. } => "move",
        Command::MoveRoot { .. } => "move-root",
        Command::Clone { .. } => "clone",
        Command::Rename { .. } => "rename",
        Command::Delete { .. } => "delete",
        Command::NewRequest { .. } => "new-request",
        Command::NewFolder { .. } => "new-folder",
        Command::Resequence { .. } => "resequence",
        Command::Init { .. } => "init",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use arbor_domain::collection::find_item_by_pathname;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    async fn open(root: &str) -> CollectionSession<FileSystemPersistence<TokioFileSystem>> {
        OpenCollection::new(
            FileSystemPersistence::new(TokioFileSystem::new()),
            Settings::default().sync,
        )
        .execute(root)
        .await
        .expect("open should work")
    }

    #[tokio::test]
    async fn test_commands_against_directory() {
        let temp = TempDir::new().expect("temp dir");
        let root = temp.path().to_str().expect("utf-8 path").to_string();
        run(Cli {
            collection: temp.path().to_path_buf(),
            timeout_ms: None,
            on_failure: None,
            command: Command::Init {
                name: "API".to_string(),
            },
        })
        .await
        .expect("init should work");

        let mut session = open(&root).await;
        let steps = [
            Command::NewFolder {
                name: "Users".to_string(),
                directory: "users".to_string(),
                parent: None,
            },
            Command::NewRequest {
                name: "Ping".to_string(),
                filename: "ping".to_string(),
                parent: None,
                payload: Some(r#"{"method":"GET"}"#.to_string()),
            },
            Command::Move {
                dragged: "ping.json".to_string(),
                target: "users".to_string(),
            },
        ];
        for step in steps {
            assert_eq!(
                apply(&mut session, step).await.expect("step should work"),
                Some(Outcome::Applied)
            );
        }

        let reloaded = open(&root).await;
        let moved = find_item_by_pathname(
            reloaded.tree(),
            &format!("{}/users/ping.json", reloaded.tree().pathname),
        )
        .expect("request moved on disk");
        assert_eq!(moved.seq(), Some(1));
    }

    #[tokio::test]
    async fn test_rename_requires_a_change() {
        let temp = TempDir::new().expect("temp dir");
        let root = temp.path().to_str().expect("utf-8 path");
        FileSystemPersistence::new(TokioFileSystem::new())
            .init_collection(root, "API")
            .await
            .expect("init should work");

        let mut session = open(root).await;
        let result = apply(
            &mut session,
            Command::Rename {
                item: "anything".to_string(),
                name: None,
                filename: None,
            },
        )
        .await;
        assert!(result.is_err());
    }
}
