//! The engine's program snapshot: loaded sources, their diagnostics, and
//! the emit step.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use kiln_common::ContentHash;
use kiln_diagnostics::{Category, Diagnostic, DiagnosticCode, Location};
use kiln_session::{Cancelled, EmitOutput, Program, StalenessGuard};
use tracing::debug;

use crate::check::check_delimiters;
use crate::layout::Layout;
use crate::source::SourceState;

/// A listed source file could not be read.
pub const UNREADABLE_SOURCE: DiagnosticCode = DiagnosticCode::new(Category::Error, 1);
/// A listed source file is not valid UTF-8.
pub const INVALID_ENCODING: DiagnosticCode = DiagnosticCode::new(Category::Error, 2);
/// The project manifest is missing or invalid.
pub const BROKEN_MANIFEST: DiagnosticCode = DiagnosticCode::new(Category::Config, 1);
/// An output could not be written.
pub const WRITE_FAILED: DiagnosticCode = DiagnosticCode::new(Category::Output, 1);
/// A source lies outside the project's root directory.
pub const OUTSIDE_ROOT: DiagnosticCode = DiagnosticCode::new(Category::Output, 2);

/// The set of sources named by the manifest, as currently known.
#[derive(Debug)]
pub struct SourceProgram {
    /// Resolved manifest the file set came from.
    layout: Layout,
    /// Set by `--no-emit`; every emit is skipped.
    no_emit: bool,
    /// Every listed source, keyed by resolved path.
    files: BTreeMap<PathBuf, SourceState>,
    /// Reported ahead of file diagnostics while the manifest is broken.
    manifest_error: Option<Diagnostic>,
    /// Bumped once per drained batch of changes.
    generation: u64,
    /// Content hash of each source as of its last committed write.
    emitted: HashMap<PathBuf, ContentHash>,
    /// Pre-emit diagnostics and the generation they were computed for.
    checked: Option<(u64, Vec<Diagnostic>)>,
}

/// Outputs written by one emit pass, not yet committed.
#[derive(Default)]
struct EmitBatch {
    diagnostics: Vec<Diagnostic>,
    /// New hash per written source; `None` where the write failed.
    outcomes: Vec<(PathBuf, Option<ContentHash>)>,
}

impl SourceProgram {
    /// Reads every file named by `layout`.
    pub fn new(layout: Layout, no_emit: bool) -> Self {
        let files = layout
            .files
            .iter()
            .map(|path| (path.clone(), SourceState::read(path)))
            .collect();
        Self {
            layout,
            no_emit,
            files,
            manifest_error: None,
            generation: 0,
            emitted: HashMap::new(),
            checked: None,
        }
    }

    /// The layout the program was built from.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Incremented each time queued changes are applied.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// What is known about `path`, if it belongs to the program.
    pub fn source(&self, path: &Path) -> Option<&SourceState> {
        self.files.get(path)
    }

    /// Re-reads `path` from disk. Paths outside the program are ignored.
    pub fn reload(&mut self, path: &Path) {
        if let Some(state) = self.files.get_mut(path) {
            *state = SourceState::read(path);
        }
    }

    /// Records that `path` was deleted.
    pub fn mark_missing(&mut self, path: &Path) {
        if let Some(state) = self.files.get_mut(path) {
            *state = SourceState::Missing("file was deleted".to_string());
        }
    }

    /// Switches to a new layout, keeping already loaded files that remain
    /// and reading the ones that were added.
    pub fn replace_layout(&mut self, layout: Layout) {
        let mut files = BTreeMap::new();
        for path in &layout.files {
            let state = match self.files.remove(path) {
                Some(state) => state,
                None => SourceState::read(path),
            };
            files.insert(path.clone(), state);
        }
        self.emitted.retain(|path, _| files.contains_key(path));
        if layout.out_dir != self.layout.out_dir || layout.extension != self.layout.extension {
            self.emitted.clear();
        }
        self.files = files;
        self.layout = layout;
    }

    /// Sets or clears the manifest problem reported with the diagnostics.
    pub fn set_manifest_error(&mut self, error: Option<String>) {
        self.manifest_error = error.map(|message| {
            Diagnostic::error(BROKEN_MANIFEST, message).at(Location::file(&self.layout.manifest))
        });
    }

    /// Marks the end of a batch of changes.
    pub fn advance(&mut self) {
        self.generation += 1;
    }

    /// Writes every output whose content changed since it was last
    /// committed. Nothing is recorded here; the caller commits the batch
    /// only if the whole pass completes.
    fn write_outputs(&self, guard: &StalenessGuard) -> Result<EmitBatch, Cancelled> {
        let mut batch = EmitBatch::default();
        for (path, state) in &self.files {
            guard.check()?;
            let SourceState::Loaded(text) = state else {
                continue;
            };
            let Some(out) = self.layout.output_path(path) else {
                batch.diagnostics.push(
                    Diagnostic::error(
                        OUTSIDE_ROOT,
                        format!(
                            "file is not under root directory '{}'",
                            self.layout.root_dir.display()
                        ),
                    )
                    .at(Location::file(path)),
                );
                continue;
            };
            if self.emitted.get(path) == Some(&text.content_hash) && out.exists() {
                continue;
            }
            let written = match out.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
                _ => Ok(()),
            }
            .and_then(|()| std::fs::write(&out, &text.content));
            match written {
                Ok(()) => {
                    debug!(output = %out.display(), "wrote output");
                    batch.outcomes.push((path.clone(), Some(text.content_hash)));
                }
                Err(e) => {
                    batch.outcomes.push((path.clone(), None));
                    batch.diagnostics.push(
                        Diagnostic::error(
                            WRITE_FAILED,
                            format!("cannot write '{}': {e}", out.display()),
                        )
                        .at(Location::file(path)),
                    );
                }
            }
        }
        Ok(batch)
    }

    fn collect_diagnostics(&self, guard: &StalenessGuard) -> Result<Vec<Diagnostic>, Cancelled> {
        let mut diagnostics: Vec<Diagnostic> = self.manifest_error.iter().cloned().collect();
        for (path, state) in &self.files {
            guard.check()?;
            match state {
                SourceState::Loaded(text) => diagnostics.extend(check_delimiters(text)),
                SourceState::Missing(reason) => diagnostics.push(
                    Diagnostic::error(UNREADABLE_SOURCE, format!("cannot read file: {reason}"))
                        .at(Location::file(path)),
                ),
                SourceState::NotUtf8 => diagnostics.push(
                    Diagnostic::error(INVALID_ENCODING, "file is not valid UTF-8")
                        .at(Location::file(path)),
                ),
            }
        }
        Ok(diagnostics)
    }
}

impl Program for SourceProgram {
    fn emit(&mut self, guard: &StalenessGuard) -> Result<EmitOutput, Cancelled> {
        if self.no_emit {
            return Ok(EmitOutput {
                skipped: true,
                diagnostics: Vec::new(),
            });
        }
        if self.layout.no_emit_on_error
            && self
                .pre_emit_diagnostics(guard)?
                .iter()
                .any(|d| d.severity.is_error())
        {
            debug!("skipping emit, program has errors");
            return Ok(EmitOutput {
                skipped: true,
                diagnostics: Vec::new(),
            });
        }

        let batch = self.write_outputs(guard)?;
        for (path, outcome) in batch.outcomes {
            match outcome {
                Some(hash) => self.emitted.insert(path, hash),
                None => self.emitted.remove(&path),
            };
        }
        Ok(EmitOutput {
            skipped: false,
            diagnostics: batch.diagnostics,
        })
    }

    fn pre_emit_diagnostics(
        &mut self,
        guard: &StalenessGuard,
    ) -> Result<Vec<Diagnostic>, Cancelled> {
        if let Some((generation, diagnostics)) = &self.checked {
            if *generation == self.generation {
                return Ok(diagnostics.clone());
            }
        }
        let diagnostics = self.collect_diagnostics(guard)?;
        self.checked = Some((self.generation, diagnostics.clone()));
        Ok(diagnostics)
    }
}
