//! Line-oriented transport: one JSON request per line in, one JSON
//! response per line out.

use std::io::{BufRead, Write};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CareerLensError, Result};
use crate::pipeline::inference::InferenceService;
use crate::service::protocol::{ErrorResponse, GuidanceResponse, MODEL_NOT_LOADED, answer};

const INVALID_UTF8: &str = "invalid UTF-8";
const TRAIN_FIRST: &str = "Train the model first with `careerlens train`";

/// Counts of answered and failed lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineSummary {
    pub answered: usize,
    pub failed: usize,
}

/// Answer one request line, rendering failures as an error object.
pub fn answer_line(
    service: &InferenceService,
    line: &str,
    top_k: usize,
) -> std::result::Result<GuidanceResponse, ErrorResponse> {
    let body: Value = serde_json::from_str(line).map_err(|e| {
        ErrorResponse::new("invalid JSON").with_message(e.to_string())
    })?;
    answer(service, &body, top_k)
        .map(GuidanceResponse::from)
        .map_err(|e| ErrorResponse::from(&e))
}

/// Answer every non-blank line of `reader` until EOF.
///
/// An unloaded service writes a single error object and fails without
/// reading input.
pub fn run_lines<R: BufRead, W: Write>(
    service: &InferenceService,
    mut reader: R,
    mut writer: W,
    top_k: usize,
) -> Result<LineSummary> {
    ensure_ready(service, &mut writer)?;

    let mut summary = LineSummary::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let outcome = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => answer_line(service, line.trim_end_matches(['\n', '\r']), top_k),
            Err(e) => Err(ErrorResponse::new(INVALID_UTF8).with_message(e.to_string())),
        };
        match outcome {
            Ok(response) => {
                write_json(&mut writer, &response)?;
                summary.answered += 1;
            }
            Err(error) => {
                warn!(error = %error.error, "request failed");
                write_json(&mut writer, &error)?;
                summary.failed += 1;
            }
        }
    }
    debug!(answered = summary.answered, failed = summary.failed, "input exhausted");
    Ok(summary)
}

/// Answer a single request passed directly, failing if it cannot be served.
pub fn run_single<W: Write>(
    service: &InferenceService,
    input: &str,
    mut writer: W,
    top_k: usize,
) -> Result<()> {
    ensure_ready(service, &mut writer)?;
    match answer_line(service, input, top_k) {
        Ok(response) => write_json(&mut writer, &response),
        Err(error) => {
            write_json(&mut writer, &error)?;
            Err(CareerLensError::invalid_input(error.error))
        }
    }
}

fn ensure_ready<W: Write>(service: &InferenceService, writer: &mut W) -> Result<()> {
    if service.is_ready() {
        return Ok(());
    }
    write_json(
        writer,
        &ErrorResponse::new(MODEL_NOT_LOADED).with_message(TRAIN_FIRST),
    )?;
    Err(CareerLensError::artifact_missing(MODEL_NOT_LOADED))
}

fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_unloaded_reports_once() {
        let service = InferenceService::unloaded();
        let mut out = Vec::new();
        let err = run_lines(&service, Cursor::new("{\"text\":\"x\"}\n"), &mut out, 3).unwrap_err();

        assert!(matches!(err, CareerLensError::ArtifactMissing(_)));
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["error"], MODEL_NOT_LOADED);
    }

    #[test]
    fn test_invalid_json_line() {
        let service = InferenceService::unloaded();
        let error = answer_line(&service, "{not json", 3).unwrap_err();
        assert_eq!(error.error, "invalid JSON");
        assert!(error.message.is_some());
    }
}
