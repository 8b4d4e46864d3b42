//! Drives the reference engine through the session manager the way a build
//! would: one request per build, inputs keyed by path with fresh digests.

use std::path::{Path, PathBuf};

use kiln_common::InputDigests;
use kiln_engine::SourceEngineFactory;
use kiln_session::{Dispatch, Request, SessionError, SessionManager, Verdict};
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    fn manifest(&self, files: &[&str]) -> PathBuf {
        let list: Vec<String> = files.iter().map(|f| format!("\"src/{f}\"")).collect();
        self.write(
            "kiln.toml",
            &format!(
                "[project]\nname = \"app\"\nroot_dir = \"src\"\nout_dir = \"out\"\nfiles = [{}]\n\n[emit]\nextension = \"js\"\n",
                list.join(", ")
            ),
        )
    }

    fn arguments(&self) -> Vec<String> {
        vec![
            "--project".to_string(),
            self.path("kiln.toml").display().to_string(),
        ]
    }
}

fn inputs(entries: &[(&Path, &str)]) -> InputDigests {
    entries.iter().map(|(p, d)| (p.to_path_buf(), *d)).collect()
}

fn completed(dispatch: Dispatch) -> Verdict {
    match dispatch {
        Dispatch::Completed(verdict) => verdict,
        Dispatch::Superseded => panic!("request was superseded"),
    }
}

#[test]
fn edits_flow_through_to_outputs() {
    let ws = Workspace::new();
    let a = ws.write("src/a.ts", "export const a = 1;\n");
    let b = ws.write("src/lib/b.ts", "export function b() {}\n");
    let manifest = ws.manifest(&["a.ts", "lib/b.ts"]);
    let mut manager = SessionManager::new(SourceEngineFactory::new());

    let first = completed(
        manager
            .dispatch(Request::new(
                ws.arguments(),
                inputs(&[(&manifest, "m1"), (&a, "a1"), (&b, "b1")]),
            ))
            .unwrap(),
    );
    assert!(first.success);
    assert_eq!(first.exit_code(), 0);
    assert_eq!(
        std::fs::read_to_string(ws.path("out/lib/b.js")).unwrap(),
        "export function b() {}\n"
    );

    ws.write("src/a.ts", "export const a = {;\n");
    let second = completed(
        manager
            .dispatch(Request::new(
                ws.arguments(),
                inputs(&[(&manifest, "m1"), (&a, "a2"), (&b, "b1")]),
            ))
            .unwrap(),
    );
    assert!(!second.success);
    assert!(second.report.contains("E101"), "report: {}", second.report);

    ws.write("src/a.ts", "export const a = 3;\n");
    let third = completed(
        manager
            .dispatch(Request::new(
                ws.arguments(),
                inputs(&[(&manifest, "m1"), (&a, "a3"), (&b, "b1")]),
            ))
            .unwrap(),
    );
    assert!(third.success);
    assert_eq!(
        std::fs::read_to_string(ws.path("out/a.js")).unwrap(),
        "export const a = 3;\n"
    );
    assert_eq!(manager.factory().constructed(), 1);
}

#[test]
fn unchanged_digest_means_no_reread() {
    let ws = Workspace::new();
    let a = ws.write("src/a.ts", "ok();\n");
    let manifest = ws.manifest(&["a.ts"]);
    let mut manager = SessionManager::new(SourceEngineFactory::new());
    let request = || Request::new(ws.arguments(), inputs(&[(&manifest, "m1"), (&a, "a1")]));

    assert!(completed(manager.dispatch(request()).unwrap()).success);

    // Disk changes the build did not report are invisible to the session.
    ws.write("src/a.ts", "broken(\n");
    assert!(completed(manager.dispatch(request()).unwrap()).success);
}

#[test]
fn deleted_input_fails_the_build() {
    let ws = Workspace::new();
    let a = ws.write("src/a.ts", "a();\n");
    let b = ws.write("src/b.ts", "b();\n");
    let manifest = ws.manifest(&["a.ts", "b.ts"]);
    let mut manager = SessionManager::new(SourceEngineFactory::new());

    let first = manager
        .dispatch(Request::new(
            ws.arguments(),
            inputs(&[(&manifest, "m1"), (&a, "a1"), (&b, "b1")]),
        ))
        .unwrap();
    assert!(completed(first).success);

    std::fs::remove_file(&b).unwrap();
    let second = completed(
        manager
            .dispatch(Request::new(
                ws.arguments(),
                inputs(&[(&manifest, "m1"), (&a, "a1")]),
            ))
            .unwrap(),
    );
    assert!(!second.success);
    assert!(second.report.contains("E001"), "report: {}", second.report);
}

#[test]
fn manifest_edit_adds_a_file() {
    let ws = Workspace::new();
    let a = ws.write("src/a.ts", "a();\n");
    let manifest = ws.manifest(&["a.ts"]);
    let mut manager = SessionManager::new(SourceEngineFactory::new());

    let first = manager
        .dispatch(Request::new(
            ws.arguments(),
            inputs(&[(&manifest, "m1"), (&a, "a1")]),
        ))
        .unwrap();
    assert!(completed(first).success);

    let c = ws.write("src/c.ts", "c();\n");
    ws.manifest(&["a.ts", "c.ts"]);
    let second = completed(
        manager
            .dispatch(Request::new(
                ws.arguments(),
                inputs(&[(&manifest, "m2"), (&a, "a1"), (&c, "c1")]),
            ))
            .unwrap(),
    );
    assert!(second.success);
    assert!(ws.path("out/c.js").exists());
    assert!(manager.session().unwrap().watches().is_watched(&c));
    assert_eq!(manager.factory().constructed(), 1);
}

#[test]
fn new_arguments_rebuild_the_session() {
    let ws = Workspace::new();
    let a = ws.write("src/a.ts", "a();\n");
    let manifest = ws.manifest(&["a.ts"]);
    let mut manager = SessionManager::new(SourceEngineFactory::new());
    let digests = inputs(&[(&manifest, "m1"), (&a, "a1")]);

    manager
        .dispatch(Request::new(ws.arguments(), digests.clone()))
        .unwrap();
    let mut check_only = ws.arguments();
    check_only.push("--no-emit".to_string());
    let verdict = completed(
        manager
            .dispatch(Request::new(check_only, digests))
            .unwrap(),
    );

    assert!(!verdict.success, "a skipped emit is not a success");
    assert_eq!(manager.factory().constructed(), 2);
}

#[test]
fn missing_manifest_is_a_configuration_error() {
    let ws = Workspace::new();
    let mut manager = SessionManager::new(SourceEngineFactory::new());

    let err = manager
        .dispatch(Request::new(ws.arguments(), InputDigests::new()))
        .unwrap_err();
    assert!(matches!(err, SessionError::Configuration { .. }));
    assert!(err.to_string().contains("kiln.toml"));
    assert!(manager.session().is_none());
}
