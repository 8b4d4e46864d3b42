//! The persistent request loop.

use std::io::{BufRead, Write};

use kiln_session::{Dispatch, EngineFactory, SessionManager};
use tracing::{debug, error, info_span, warn};

use crate::error::WorkerError;
use crate::protocol::{decode_request, WorkRequest, WorkResponse};

/// Serves requests from `input` until it is exhausted, writing one response
/// line per answered request to `output`. The live session is released on
/// the way out.
pub fn serve<F, R, W>(
    manager: &mut SessionManager<F>,
    mut input: R,
    mut output: W,
) -> Result<(), WorkerError>
where
    F: EngineFactory,
    R: BufRead,
    W: Write,
{
    let mut line = Vec::new();
    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        if let Some(response) = handle_line(manager, &line) {
            serde_json::to_writer(&mut output, &response).map_err(std::io::Error::from)?;
            output.write_all(b"\n")?;
            output.flush()?;
        }
    }
    if manager.release() {
        debug!("input closed, session released");
    }
    Ok(())
}

/// Handles one raw request line. `None` means no response is owed.
///
/// Lines that are not valid JSON, including lines that are not UTF-8, get
/// a failure response.
pub fn handle_line<F: EngineFactory>(
    manager: &mut SessionManager<F>,
    line: &[u8],
) -> Option<WorkResponse> {
    match decode_request(line) {
        Ok(request) => respond(manager, request),
        Err(e) => {
            error!(error = %e, "dropping unreadable request");
            Some(WorkResponse::failure(0, e.to_string()))
        }
    }
}

fn respond<F: EngineFactory>(
    manager: &mut SessionManager<F>,
    request: WorkRequest,
) -> Option<WorkResponse> {
    let id = request.request_id;
    let span = info_span!(
        "request",
        id,
        arguments = request.arguments.len(),
        inputs = request.inputs.len()
    );
    let _enter = span.enter();

    let request = match request.into_request() {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "request rejected");
            return Some(WorkResponse::failure(id, e.to_string()));
        }
    };

    match manager.dispatch(request) {
        Ok(Dispatch::Completed(verdict)) => Some(WorkResponse {
            exit_code: verdict.exit_code(),
            output: verdict.report,
            request_id: id,
        }),
        Ok(Dispatch::Superseded) => None,
        Err(e) => {
            warn!(error = %e, "build configuration rejected");
            Some(WorkResponse::failure(id, e.to_string()))
        }
    }
}
