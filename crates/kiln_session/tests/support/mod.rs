//! A recording engine used by the integration suites.
//!
//! Arguments understood by [`MockFactory`]:
//! - `watch=<path>`: open a watch on `<path>` at construction
//! - `diag=<message>`: report a pre-emit diagnostic on every emit
//! - `skip`: report every emit as skipped
//! - `fail`: refuse construction with a configuration error

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use kiln_diagnostics::{Category, Diagnostic, DiagnosticCode};
use kiln_session::{
    Cancelled, ChangeKind, EmitOutput, Engine, EngineFactory, InvalidationRegistry, Program,
    SessionError, StalenessGuard,
};

pub type Log = Arc<Mutex<Vec<String>>>;
pub type EmitHook = Arc<Mutex<Option<Box<dyn FnMut() + Send>>>>;

#[derive(Default)]
pub struct MockFactory {
    pub log: Log,
    pub emit_hook: EmitHook,
    constructed: usize,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

pub fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub struct MockEngine {
    pub id: usize,
    log: Log,
    pending: Arc<Mutex<Vec<(PathBuf, ChangeKind)>>>,
    watched: Vec<PathBuf>,
    program: MockProgram,
}

pub struct MockProgram {
    pub id: usize,
    pub generation: u64,
    pub contents: BTreeMap<PathBuf, u32>,
    diagnostics: Vec<String>,
    skip: bool,
    log: Log,
    hook: EmitHook,
}

impl EngineFactory for MockFactory {
    type Engine = MockEngine;

    fn construct(
        &mut self,
        arguments: &[String],
        watches: &mut InvalidationRegistry,
    ) -> Result<MockEngine, SessionError> {
        if arguments.iter().any(|a| a == "fail") {
            self.log.lock().unwrap().push("construct-failed".to_string());
            return Err(SessionError::configuration("construction refused"));
        }
        self.constructed += 1;
        let id = self.constructed;
        self.log.lock().unwrap().push(format!("construct#{id}"));

        let pending: Arc<Mutex<Vec<(PathBuf, ChangeKind)>>> = Arc::default();
        let mut watched = Vec::new();
        for path in arguments.iter().filter_map(|a| a.strip_prefix("watch=")) {
            let queue = Arc::clone(&pending);
            watches.register(
                path,
                Box::new(move |p: &Path, kind: ChangeKind| {
                    queue.lock().unwrap().push((p.to_path_buf(), kind));
                }),
            );
            watched.push(PathBuf::from(path));
        }

        Ok(MockEngine {
            id,
            log: Arc::clone(&self.log),
            pending,
            watched,
            program: MockProgram {
                id,
                generation: 0,
                contents: BTreeMap::new(),
                diagnostics: arguments
                    .iter()
                    .filter_map(|a| a.strip_prefix("diag="))
                    .map(str::to_string)
                    .collect(),
                skip: arguments.iter().any(|a| a == "skip"),
                log: Arc::clone(&self.log),
                hook: Arc::clone(&self.emit_hook),
            },
        })
    }
}

impl Engine for MockEngine {
    type Program = MockProgram;

    fn drain_pending(&mut self, _watches: &mut InvalidationRegistry) {
        let queued = std::mem::take(&mut *self.pending.lock().unwrap());
        if queued.is_empty() {
            return;
        }
        for (path, kind) in queued {
            self.log
                .lock()
                .unwrap()
                .push(format!("apply#{} {} {}", self.id, kind, path.display()));
            let contents = &mut self.program.contents;
            match kind {
                ChangeKind::Created => {
                    contents.insert(path, 0);
                }
                ChangeKind::Changed => {
                    *contents.entry(path).or_insert(0) += 1;
                }
                ChangeKind::Deleted => {
                    contents.remove(&path);
                }
            }
        }
        self.program.generation += 1;
    }

    fn program(&mut self) -> &mut MockProgram {
        &mut self.program
    }

    fn close(self, watches: &mut InvalidationRegistry) {
        for path in &self.watched {
            watches.unregister(path);
        }
        self.log.lock().unwrap().push(format!("close#{}", self.id));
    }
}

impl Program for MockProgram {
    fn emit(&mut self, guard: &StalenessGuard) -> Result<EmitOutput, Cancelled> {
        let hook = self.hook.lock().unwrap().take();
        if let Some(mut hook) = hook {
            hook();
        }
        guard.check()?;
        self.log
            .lock()
            .unwrap()
            .push(format!("emit#{} gen{}", self.id, self.generation));
        Ok(EmitOutput {
            skipped: self.skip,
            diagnostics: Vec::new(),
        })
    }

    fn pre_emit_diagnostics(
        &mut self,
        guard: &StalenessGuard,
    ) -> Result<Vec<Diagnostic>, Cancelled> {
        guard.check()?;
        Ok(self
            .diagnostics
            .iter()
            .map(|m| Diagnostic::error(DiagnosticCode::new(Category::Error, 1), m.clone()))
            .collect())
    }
}

impl MockEngine {
    pub fn program_ref(&self) -> &MockProgram {
        &self.program
    }
}
