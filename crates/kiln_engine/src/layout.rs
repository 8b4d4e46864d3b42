//! Resolved project layout: which files make up the program and where their
//! outputs go.

use std::path::{Component, Path, PathBuf};

use kiln_config::ProjectConfig;

use crate::error::EngineError;

/// A project manifest with every path resolved against its directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// The manifest file itself.
    pub manifest: PathBuf,
    /// Directory output paths are computed relative to.
    pub root_dir: PathBuf,
    /// Directory outputs are written into.
    pub out_dir: PathBuf,
    /// The program's source files, in manifest order, without duplicates.
    pub files: Vec<PathBuf>,
    /// Replacement extension for outputs.
    pub extension: Option<String>,
    /// Whether to skip emit when the program has diagnostics.
    pub no_emit_on_error: bool,
}

impl Layout {
    /// Loads the manifest at `manifest` and resolves its paths.
    ///
    /// `out_dir` overrides the manifest's `project.out_dir`; it is taken as
    /// given rather than relative to the manifest.
    pub fn load(manifest: &Path, out_dir: Option<&Path>) -> Result<Self, EngineError> {
        let config = kiln_config::load_project(manifest).map_err(|source| EngineError::Config {
            path: manifest.to_path_buf(),
            source,
        })?;
        Ok(Self::resolve(manifest, &config, out_dir))
    }

    /// Resolves an already parsed manifest.
    pub fn resolve(manifest: &Path, config: &ProjectConfig, out_dir: Option<&Path>) -> Self {
        let base = manifest.parent().unwrap_or_else(|| Path::new(""));
        let mut files: Vec<PathBuf> = Vec::with_capacity(config.project.files.len());
        for file in &config.project.files {
            let path = normalize(&base.join(file));
            if !files.contains(&path) {
                files.push(path);
            }
        }

        Self {
            manifest: normalize(manifest),
            root_dir: normalize(&base.join(&config.project.root_dir)),
            out_dir: match out_dir {
                Some(dir) => normalize(dir),
                None => normalize(&base.join(&config.project.out_dir)),
            },
            files,
            extension: config.emit.extension.clone(),
            no_emit_on_error: config.emit.no_emit_on_error,
        }
    }

    /// Where the output for `file` is written, or `None` when `file` lies
    /// outside the root directory.
    pub fn output_path(&self, file: &Path) -> Option<PathBuf> {
        let relative = if self.root_dir.as_os_str().is_empty() {
            file
        } else {
            file.strip_prefix(&self.root_dir).ok()?
        };
        let mut out = self.out_dir.join(relative);
        if let Some(ext) = &self.extension {
            out.set_extension(ext);
        }
        Some(out)
    }
}

/// Drops `.` components so paths match the build's input keys.
pub fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> ProjectConfig {
        kiln_config::load_project_from_str(toml).unwrap()
    }

    const BASIC: &str = r#"
[project]
name = "app"
root_dir = "src"
out_dir = "out"
files = ["src/a.ts", "./src/lib/b.ts", "src/a.ts"]
"#;

    #[test]
    fn paths_resolve_against_manifest_dir() {
        let layout = Layout::resolve(Path::new("pkg/kiln.toml"), &config(BASIC), None);
        assert_eq!(
            layout.files,
            vec![PathBuf::from("pkg/src/a.ts"), PathBuf::from("pkg/src/lib/b.ts")]
        );
        assert_eq!(layout.root_dir, PathBuf::from("pkg/src"));
        assert_eq!(layout.out_dir, PathBuf::from("pkg/out"));
    }

    #[test]
    fn manifest_in_current_dir() {
        let layout = Layout::resolve(Path::new("kiln.toml"), &config(BASIC), None);
        assert_eq!(layout.files[0], PathBuf::from("src/a.ts"));
        assert_eq!(layout.manifest, PathBuf::from("kiln.toml"));
    }

    #[test]
    fn output_paths_are_relative_to_root_dir() {
        let layout = Layout::resolve(Path::new("kiln.toml"), &config(BASIC), None);
        assert_eq!(
            layout.output_path(Path::new("src/lib/b.ts")),
            Some(PathBuf::from("out/lib/b.ts"))
        );
        assert_eq!(layout.output_path(Path::new("other/c.ts")), None);
    }

    #[test]
    fn out_dir_override_and_extension() {
        let toml = r#"
[project]
name = "app"
out_dir = "out"
files = ["a.ts"]
[emit]
extension = "js"
"#;
        let layout = Layout::resolve(
            Path::new("kiln.toml"),
            &config(toml),
            Some(Path::new("bazel-out/bin")),
        );
        assert_eq!(
            layout.output_path(Path::new("a.ts")),
            Some(PathBuf::from("bazel-out/bin/a.js"))
        );
    }

    #[test]
    fn load_missing_manifest_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Layout::load(&dir.path().join("kiln.toml"), None).unwrap_err();
        assert!(matches!(err, EngineError::Config { .. }));
    }
}
