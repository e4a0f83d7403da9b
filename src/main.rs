use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};

use flashdeck::core::action::{Action, update};
use flashdeck::core::config::{self, CliOverrides, FlashdeckConfig};
use flashdeck::core::snapshot;
use flashdeck::core::state::App;
use flashdeck::core::store::{self, FileStore, MemoryStore, PersistentStore};
use flashdeck::source;
use flashdeck::tui;

#[derive(Parser)]
#[command(name = "flashdeck", about = "Flashcards from CSV files")]
struct Args {
    /// CSV files or folders of CSV files
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Import a previously exported snapshot
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Start in this scope (a folder or file path from the deck)
    #[arg(long, value_name = "KEY")]
    scope: Option<String>,

    /// Show the back of each card first
    #[arg(long)]
    back_first: bool,

    /// Ignore the saved session for these files
    #[arg(long)]
    no_resume: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("flashdeck: {e}; using defaults");
        FlashdeckConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            back_first: args.back_first,
            no_resume: args.no_resume,
        },
    );

    // Initialize file logger - writes to flashdeck.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("flashdeck.log") {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!("flashdeck starting up with {} selections", args.paths.len());

    let mut store: Box<dyn PersistentStore> = match FileStore::open(&resolved.snapshot_dir) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("Snapshot store unavailable, progress will not be kept: {e}");
            Box::new(MemoryStore::new())
        }
    };

    let deck = match source::load_deck(args.paths.clone()).await {
        Ok(deck) => deck,
        Err(e) => {
            log::warn!("Initial load failed: {e}");
            eprintln!("flashdeck: {e}");
            std::process::exit(1);
        }
    };

    let mut app = App::from_config(&resolved);
    app.sources = args.paths.clone();
    app.install_deck(deck);

    if let Some(path) = &args.import {
        match std::fs::read(path) {
            Ok(bytes) => {
                let action = match snapshot::from_bytes(&bytes) {
                    Ok(snap) => Action::ImportSnapshot(snap),
                    Err(e) => Action::SnapshotFailed(e),
                };
                update(&mut app, action);
            }
            Err(e) => app.fail(format!("Import failed: cannot read {}: {e}", path.display())),
        }
    } else if resolved.resume {
        let stored = app
            .deck
            .as_ref()
            .and_then(|deck| store::load_snapshot(&*store, deck));
        if let Some(snap) = stored {
            update(&mut app, Action::ResumeSnapshot(snap));
        }
    }

    if let Some(scope) = args.scope {
        update(&mut app, Action::ChangeScope(scope));
    }

    tui::run(app, &mut *store, &resolved)
}
