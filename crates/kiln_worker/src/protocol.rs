//! Newline-delimited JSON work requests and responses.

use std::io;
use std::path::{Path, PathBuf};

use kiln_common::{Digest, InputDigests};
use kiln_session::Request;
use serde::{Deserialize, Serialize};

/// One input file and its digest as sent by the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkInput {
    /// Path of the input, relative to the build's execution root.
    pub path: PathBuf,
    /// Opaque digest of the file's contents.
    pub digest: Digest,
}

/// A request line read from stdin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequest {
    /// Engine arguments; entries starting with `@` name flag files.
    #[serde(default)]
    pub arguments: Vec<String>,
    /// Every input relevant to this build.
    #[serde(default)]
    pub inputs: Vec<WorkInput>,
    /// Echoed back in the response.
    #[serde(default)]
    pub request_id: i64,
}

impl WorkRequest {
    /// Expands flag files and builds the session-layer request.
    pub fn into_request(self) -> Result<Request, ProtocolError> {
        let arguments = expand_flagfiles(self.arguments)?;
        let inputs: InputDigests = self
            .inputs
            .into_iter()
            .map(|input| (input.path, input.digest))
            .collect();
        Ok(Request::new(arguments, inputs))
    }
}

/// A response line written to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkResponse {
    /// 0 on success, 1 on failure.
    pub exit_code: i32,
    /// Diagnostics or error text to show the user.
    pub output: String,
    /// The id of the request this answers.
    pub request_id: i64,
}

impl WorkResponse {
    /// A failed response carrying `output`.
    pub fn failure(request_id: i64, output: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            output: output.into(),
            request_id,
        }
    }
}

/// A request that could not be turned into a build.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The line is not a valid request.
    #[error("malformed work request: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A `@flagfile` argument could not be read.
    #[error("cannot read flag file {}: {source}", path.display())]
    Flagfile {
        /// The named flag file.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

/// Parses one request line.
pub fn decode_request(line: &[u8]) -> Result<WorkRequest, ProtocolError> {
    Ok(serde_json::from_slice(line)?)
}

/// Reads an arguments file: one argument per line, final empty line dropped.
pub fn read_args_file(path: &Path) -> io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let mut lines: Vec<String> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    Ok(lines)
}

/// Replaces each `@file` argument with the lines of that file.
pub fn expand_flagfiles(arguments: Vec<String>) -> Result<Vec<String>, ProtocolError> {
    let mut expanded = Vec::with_capacity(arguments.len());
    for argument in arguments {
        match argument.strip_prefix('@') {
            Some(file) => {
                let path = PathBuf::from(file);
                let lines = read_args_file(&path)
                    .map_err(|source| ProtocolError::Flagfile { path, source })?;
                expanded.extend(lines);
            }
            None => expanded.push(argument),
        }
    }
    Ok(expanded)
}
