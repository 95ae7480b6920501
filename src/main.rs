use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use vaultnav::selection::Selection;
use vaultnav::types::GotoTarget;
use vaultnav::workspace::Workspace;

/// Wikilink navigation for multi-vault markdown workspaces.
#[derive(Parser)]
#[command(
    name = "vaultnav",
    version,
    about = "Wikilink navigation for multi-vault markdown workspaces"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new workspace
    Init {
        /// Workspace path (default: current directory)
        path: Option<String>,
    },
    /// Follow the link under a selection
    Goto {
        /// Selected text: a wikilink, or a line containing one
        selection: String,
        /// Cursor byte offset within the selection text
        #[arg(short, long)]
        offset: Option<usize>,
        /// Workspace path
        #[arg(short, long)]
        path: Option<String>,
        /// Output the response envelope as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// List notes matching a name, in lookup order
    Find {
        /// Note name (fname)
        fname: String,
        /// Restrict to this vault
        #[arg(short, long)]
        vault: Option<String>,
        /// Workspace path
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Show vaults and note counts
    Status {
        /// Workspace path (default: current directory)
        path: Option<String>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Runs a command. `Ok(false)` means the command reported a soft failure.
async fn run(cli: Cli) -> vaultnav::errors::Result<bool> {
    match cli.command {
        Commands::Init { path } => {
            let root = resolve_path(path);
            let ws = Workspace::init(&root)?;
            println!("Initialized workspace at {}", root.display());
            for vault in ws.vaults() {
                println!("  vault '{}' -> {}", vault.name, vault.fs_path);
            }
        }
        Commands::Goto {
            selection,
            offset,
            path,
            json,
        } => {
            let root = resolve_path(path);
            let ws = Workspace::open(&root)?;
            let selection = match offset {
                Some(offset) => Selection::at_cursor(selection, offset),
                None => Selection::new(selection),
            };
            let dispatcher = ws.dispatcher(Arc::new(selection));
            let response = dispatcher.execute().await?;
            dispatcher.flush().await;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(response.is_success());
            }
            match response.into_result() {
                Ok(GotoTarget::Note { note_path, anchor }) => match anchor {
                    Some(anchor) => println!("{}#{}", note_path, anchor),
                    None => println!("{}", note_path),
                },
                Ok(GotoTarget::Link { full_path }) => println!("{}", full_path),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return Ok(false);
                }
            }
        }
        Commands::Find { fname, vault, path } => {
            let root = resolve_path(path);
            let ws = Workspace::open(&root)?;
            let notes = ws.find_notes(&fname, vault.as_deref())?;
            if notes.is_empty() {
                println!("No notes found for '{}'", fname);
            } else {
                for note in &notes {
                    println!("{} ({}) - {}", note.fname, note.vault.name, note.path);
                    if let Some(uri) = note.goto_uri() {
                        println!("  -> {}", uri);
                    }
                }
            }
        }
        Commands::Status { path, json } => {
            let root = resolve_path(path);
            let ws = Workspace::open(&root)?;
            let stats = ws.get_stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Workspace {}", ws.root().display());
                for s in &stats {
                    println!(
                        "  {}: {} notes ({})",
                        s.vault.name, s.note_count, s.vault.fs_path
                    );
                }
            }
        }
    }
    Ok(true)
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
