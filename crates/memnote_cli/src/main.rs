//! `memnote`: terminal client for the memnote server.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use memnote_cli::render::{delete_prompt, render};
use memnote_cli::{CreateMode, NotesApi, NotesApp, DEFAULT_BASE_URL};
use memnote_core::{init_logging, Note};
use std::io::{self, BufRead, Write};
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "memnote", version, about = "Read and edit notes on a memnote server")]
struct Cli {
    /// Server base URL
    #[arg(long, env = "MEMNOTE_URL", default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Log level written to stderr
    #[arg(long, env = "MEMNOTE_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every note
    List,
    /// Create a note
    Add {
        text: String,
        /// Send as plain text through the legacy `PUT /texts`
        #[arg(long)]
        plain: bool,
    },
    /// Replace the text of a note
    Edit {
        /// Full id or a unique prefix of it
        id: String,
        text: String,
    },
    /// Delete a note after confirmation
    Delete {
        /// Full id or a unique prefix of it
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, None).context("failed to start logging")?;

    let mut app = NotesApp::new(NotesApi::new(cli.url));
    app.load().await;

    match cli.command {
        Command::List => {}
        Command::Add { text, plain } => {
            let mode = if plain {
                CreateMode::PlainText
            } else {
                CreateMode::Json
            };
            app.create(&text, mode).await;
        }
        Command::Edit { id, text } => {
            let note = listed_note(&app, &id)?;
            app.start_edit(&note);
            app.set_edit_text(text);
            app.save_edit().await;
        }
        Command::Delete { id, yes } => {
            let note = listed_note(&app, &id)?;
            app.request_delete(&note);
            if yes || confirm(&app)? {
                app.confirm_delete().await;
            } else {
                app.cancel_delete();
            }
        }
    }

    let now = Instant::now();
    app.clear_expired(now);
    print!("{}", render(app.state(), now));
    if app.state().error().is_some() {
        std::process::exit(1);
    }
    Ok(())
}

fn listed_note(app: &NotesApp, id: &str) -> Result<Note> {
    if let Some(error) = app.state().error() {
        bail!("{error}");
    }
    app.find_note(id)
        .cloned()
        .with_context(|| format!("no single note matches id `{id}`"))
}

fn confirm(app: &NotesApp) -> Result<bool> {
    let Some(prompt) = delete_prompt(app.state()) else {
        return Ok(false);
    };
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
