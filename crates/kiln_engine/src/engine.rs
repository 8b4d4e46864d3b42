//! The engine and its factory.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use kiln_session::{ChangeKind, Engine, EngineFactory, InvalidationRegistry, SessionError};
use tracing::{debug, info};

use crate::args::EngineArgs;
use crate::layout::Layout;
use crate::program::SourceProgram;

type Pending = (PathBuf, ChangeKind);

/// Builds a [`SourceEngine`] from a request's argument list.
#[derive(Debug, Default)]
pub struct SourceEngineFactory {
    constructed: u64,
}

impl SourceEngineFactory {
    /// Creates a factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many engines this factory has built.
    pub fn constructed(&self) -> u64 {
        self.constructed
    }
}

impl EngineFactory for SourceEngineFactory {
    type Engine = SourceEngine;

    fn construct(
        &mut self,
        arguments: &[String],
        watches: &mut InvalidationRegistry,
    ) -> Result<SourceEngine, SessionError> {
        let args = EngineArgs::parse_list(arguments)?;
        let layout = Layout::load(&args.project, args.out_dir.as_deref())?;
        let (sender, receiver) = mpsc::channel();

        let mut engine = SourceEngine {
            out_dir: args.out_dir,
            sender,
            receiver,
            watched: BTreeSet::new(),
            program: SourceProgram::new(layout.clone(), args.no_emit),
        };
        engine.watch(watches, layout.manifest.clone());
        for file in layout.files {
            engine.watch(watches, file);
        }

        self.constructed += 1;
        info!(
            project = %args.project.display(),
            files = engine.program.layout().files.len(),
            "engine constructed"
        );
        Ok(engine)
    }
}

/// An engine over the sources listed in one project manifest.
///
/// Watch callbacks push onto a channel; nothing is re-read until
/// [`Engine::drain_pending`] runs.
#[derive(Debug)]
pub struct SourceEngine {
    out_dir: Option<PathBuf>,
    sender: Sender<Pending>,
    receiver: Receiver<Pending>,
    watched: BTreeSet<PathBuf>,
    program: SourceProgram,
}

impl SourceEngine {
    /// Read access to the current program.
    pub fn program_ref(&self) -> &SourceProgram {
        &self.program
    }

    fn watch(&mut self, watches: &mut InvalidationRegistry, path: PathBuf) {
        let sender = self.sender.clone();
        watches.register(
            path.clone(),
            Box::new(move |changed: &Path, kind: ChangeKind| {
                // Fails only once the engine is closed.
                let _ = sender.send((changed.to_path_buf(), kind));
            }),
        );
        self.watched.insert(path);
    }

    fn unwatch(&mut self, watches: &mut InvalidationRegistry, path: &Path) {
        watches.unregister(path);
        self.watched.remove(path);
    }

    fn reload_manifest(&mut self, kind: ChangeKind, watches: &mut InvalidationRegistry) {
        if kind == ChangeKind::Deleted {
            self.program
                .set_manifest_error(Some("project manifest was deleted".to_string()));
            return;
        }
        let manifest = self.program.layout().manifest.clone();
        let layout = match Layout::load(&manifest, self.out_dir.as_deref()) {
            Ok(layout) => layout,
            Err(e) => {
                self.program.set_manifest_error(Some(e.to_string()));
                return;
            }
        };
        self.program.set_manifest_error(None);

        let old: BTreeSet<PathBuf> = self.program.layout().files.iter().cloned().collect();
        let new: BTreeSet<PathBuf> = layout.files.iter().cloned().collect();
        for removed in old.difference(&new) {
            if *removed != manifest {
                self.unwatch(watches, removed);
            }
        }
        for added in new.difference(&old) {
            self.watch(watches, added.clone());
        }
        debug!(
            added = new.difference(&old).count(),
            removed = old.difference(&new).count(),
            "project manifest reloaded"
        );
        self.program.replace_layout(layout);
    }
}

impl Engine for SourceEngine {
    type Program = SourceProgram;

    fn drain_pending(&mut self, watches: &mut InvalidationRegistry) {
        let pending: Vec<Pending> = self.receiver.try_iter().collect();
        if pending.is_empty() {
            return;
        }
        for (path, kind) in pending {
            if path == self.program.layout().manifest {
                self.reload_manifest(kind, watches);
            } else if kind == ChangeKind::Deleted {
                self.program.mark_missing(&path);
            } else {
                self.program.reload(&path);
            }
        }
        self.program.advance();
        debug!(generation = self.program.generation(), "applied pending changes");
    }

    fn program(&mut self) -> &mut SourceProgram {
        &mut self.program
    }

    fn close(self, watches: &mut InvalidationRegistry) {
        for path in &self.watched {
            watches.unregister(path);
        }
        debug!(watches = self.watched.len(), "engine closed");
    }
}
