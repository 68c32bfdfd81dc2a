//! The read-dispatch-render loop and its hand-off to a presentation layer.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{Receiver, SyncSender};

use crate::engine::interpreter::Interpreter;
use crate::engine::pathfind::TerrainRouter;
use crate::error::MapError;
use crate::settings::SettingsStore;
use crate::world::{MapStore, RoomGraph};

/// Messages from the interpreter thread to an attached presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Terminate,
}

pub struct InterpreterLoop {
    interpreter: Interpreter,
    store: SettingsStore,
    warnings: Vec<String>,
    presentation: Option<SyncSender<Signal>>,
}

impl InterpreterLoop {
    /// Loads settings from `store` and places the player in the graph.
    /// Unusable settings files become startup warnings.
    pub fn start(
        graph: RoomGraph,
        map_store: Box<dyn MapStore + Send>,
        store: SettingsStore,
    ) -> Result<Self, MapError> {
        let (settings, warnings) = store.load();
        let interpreter = Interpreter::new(graph, settings, Box::new(TerrainRouter), map_store)?;
        Ok(InterpreterLoop {
            interpreter,
            store,
            warnings: warnings.iter().map(ToString::to_string).collect(),
            presentation: None,
        })
    }

    /// Sends [`Signal::Terminate`] through `sender` when the loop ends.
    pub fn attach(&mut self, sender: SyncSender<Signal>) {
        self.presentation = Some(sender);
    }

    /// Runs until `quit` (or any prefix of it) or end of input, then saves
    /// the settings. Hands the interpreter back for inspection.
    ///
    /// Settings are saved and the presentation layer is signalled even when
    /// reading or writing fails; that failure is returned afterwards.
    pub fn run<R, W>(mut self, input: R, output: &mut W) -> io::Result<Interpreter>
    where
        R: BufRead,
        W: Write,
    {
        let served = self.serve(input, output);
        if let Err(e) = &served {
            log::warn!("interpreter loop stopped early: {e}");
        }
        let interpreter = self.shutdown(output);
        served.map(|()| interpreter)
    }

    fn serve<R: BufRead, W: Write>(&mut self, mut input: R, output: &mut W) -> io::Result<()> {
        writeln!(output, "Welcome to the map emulator!")?;
        writeln!(output, "Loaded {} rooms.", self.interpreter.graph().len())?;
        for warning in &self.warnings {
            writeln!(output, "Warning: {warning}")?;
        }
        self.interpreter.initialize().write_to(output)?;

        let mut line = Vec::new();
        loop {
            write!(output, "{}", self.interpreter.prompt())?;
            output.flush()?;

            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                // End the prompt line before saying goodbye.
                writeln!(output)?;
                return Ok(());
            }

            // Undecodable bytes become U+FFFD and fall through to the
            // unknown-command reply.
            let command = String::from_utf8_lossy(&line).trim().to_lowercase();
            if command.is_empty() {
                continue;
            }
            if "quit".starts_with(&command) {
                return Ok(());
            }
            self.interpreter.step(&command).write_to(output)?;
        }
    }

    fn shutdown<W: Write>(self, output: &mut W) -> Interpreter {
        let saved = self.store.save(self.interpreter.settings());
        if let Some(sender) = &self.presentation {
            if sender.send(Signal::Terminate).is_err() {
                log::debug!("presentation layer already gone");
            }
        }

        let farewell = match &saved {
            Ok(()) => Ok(()),
            Err(e) => {
                log::warn!("{e}");
                writeln!(output, "Warning: {e}")
            }
        }
        .and_then(|()| writeln!(output, "Good bye."));
        if let Err(e) = farewell {
            log::warn!("cannot write farewell: {e}");
        }

        log::info!("session ended in room {}", self.interpreter.current_vnum());
        self.interpreter
    }
}

/// Blocks until the interpreter signals termination or drops its sender.
pub fn presentation_loop(receiver: &Receiver<Signal>) {
    log::info!("presentation layer attached");
    match receiver.recv() {
        Ok(Signal::Terminate) => log::info!("presentation layer stopped"),
        Err(_) => log::info!("interpreter hung up; presentation layer stopped"),
    }
}
