use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::thread;

use clap::Parser;
use mapemu::engine::{InterpreterLoop, presentation_loop};
use mapemu::settings::SettingsStore;
use mapemu::world::{TomlMapFile, load_graph_from_file};

/// Walk, inspect and edit a captured MUME map offline.
#[derive(Parser, Debug)]
#[command(name = "mapemu", version, about)]
struct Cli {
    /// Room graph database
    #[arg(long, default_value = "data/map.toml")]
    map: PathBuf,

    /// Directory holding settings.json.sample and settings.json
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Attach the presentation layer on the main thread
    #[arg(long)]
    gui: bool,
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let graph = match load_graph_from_file(&cli.map) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Failed to load map file '{}': {e}", cli.map.display());
            process::exit(1);
        }
    };

    let mut session = match InterpreterLoop::start(
        graph,
        Box::new(TomlMapFile::new(cli.map.clone())),
        SettingsStore::in_dir(&cli.data_dir),
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to start: {e}");
            process::exit(1);
        }
    };

    let receiver = if cli.gui {
        let (sender, receiver) = mpsc::sync_channel(1);
        session.attach(sender);
        Some(receiver)
    } else {
        None
    };

    let interpreter = thread::Builder::new()
        .name("interpreter".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            session.run(stdin.lock(), &mut stdout).map(|_| ())
        })?;

    if let Some(receiver) = receiver {
        presentation_loop(&receiver);
    }

    match interpreter.join() {
        Ok(result) => result,
        Err(_) => Err(io::Error::other("interpreter thread panicked")),
    }
}
