//! Standalone mode: one build described by an arguments file, then exit.

use std::path::PathBuf;

use kiln_common::InputDigests;
use kiln_session::{Dispatch, EngineFactory, Request, SessionManager};
use tracing::{debug, warn};

use crate::error::WorkerError;
use crate::protocol::read_args_file;

/// Runs a single build from `args_file` (a leading `@` is ignored) and
/// returns the process exit code.
pub fn run<F: EngineFactory>(
    manager: &mut SessionManager<F>,
    args_file: &str,
) -> Result<i32, WorkerError> {
    warn!("running as a standalone process; the build may not be configured for persistent workers");

    let path = PathBuf::from(args_file.strip_prefix('@').unwrap_or(args_file));
    let arguments =
        read_args_file(&path).map_err(|source| WorkerError::ArgsFile { path, source })?;

    let outcome = manager.dispatch(Request::new(arguments, InputDigests::new()));
    manager.release();

    match outcome? {
        Dispatch::Completed(verdict) => Ok(verdict.exit_code()),
        Dispatch::Superseded => {
            debug!("standalone build was superseded");
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_engine::SourceEngineFactory;
    use kiln_session::SessionError;

    fn args_file(dir: &std::path::Path, source: &str) -> String {
        std::fs::write(dir.join("a.ts"), source).unwrap();
        std::fs::write(
            dir.join("kiln.toml"),
            "[project]\nname = \"one\"\nout_dir = \"out\"\nfiles = [\"a.ts\"]\n",
        )
        .unwrap();
        let args = dir.join("args.txt");
        std::fs::write(&args, format!("--project\n{}\n", dir.join("kiln.toml").display())).unwrap();
        format!("@{}", args.display())
    }

    #[test]
    fn clean_build_exits_zero_and_releases() {
        let dir = tempfile::tempdir().unwrap();
        let file = args_file(dir.path(), "ok();\n");
        let mut manager = SessionManager::new(SourceEngineFactory::new());

        assert_eq!(run(&mut manager, &file).unwrap(), 0);
        assert!(dir.path().join("out/a.ts").exists());
        assert!(manager.session().is_none());
    }

    #[test]
    fn failing_build_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let file = args_file(dir.path(), "broken(\n");
        let mut manager = SessionManager::new(SourceEngineFactory::new());
        assert_eq!(run(&mut manager, &file).unwrap(), 1);
    }

    #[test]
    fn missing_args_file_is_an_error() {
        let mut manager = SessionManager::new(SourceEngineFactory::new());
        let err = run(&mut manager, "@/nonexistent/args.txt").unwrap_err();
        assert!(matches!(err, WorkerError::ArgsFile { .. }));
    }

    #[test]
    fn bad_arguments_surface_as_session_errors() {
        let dir = tempfile::tempdir().unwrap();
        let args = dir.path().join("args.txt");
        std::fs::write(&args, "--bogus\n").unwrap();
        let mut manager = SessionManager::new(SourceEngineFactory::new());

        let err = run(&mut manager, args.to_str().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            WorkerError::Session(SessionError::Configuration { .. })
        ));
    }
}
