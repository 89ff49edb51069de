use std::io::{self, Write};

use anyhow::Result;
use helpindex_core::{ErrorPayload, IndexError};

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub(super) fn print_stderr_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stderr = io::stderr().lock();
    serde_json::to_writer_pretty(&mut stderr, value)?;
    writeln!(stderr)?;
    Ok(())
}

/// Payload of the first core error in the chain, with the full context chain as
/// its message. Errors from outside the core report as internal.
pub(super) fn error_payload(operation: &str, err: &anyhow::Error) -> ErrorPayload {
    let mut payload = match err.chain().find_map(|cause| cause.downcast_ref::<IndexError>()) {
        Some(core) => core.to_payload(operation, None),
        None => IndexError::Internal(err.to_string()).to_payload(operation, None),
    };
    payload.message = format!("{err:#}");
    payload
}
