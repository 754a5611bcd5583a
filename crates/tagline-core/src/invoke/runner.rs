//! Synchronous execution of an assembled invocation.

use std::process::{Command, ExitStatus};

use crate::error::{CaptionError, CaptionResult};

use super::Invocation;

/// Run the invocation to completion, blocking the caller.
///
/// The child inherits the standard streams, so tagger progress lands on the
/// user's terminal directly. The full command line is logged before spawn.
///
/// A non-zero exit status is returned as data, not as an error — whether to
/// tolerate it is the caller's policy decision. Only failure to start the
/// launcher at all is an `Err`.
pub fn execute(invocation: &Invocation) -> CaptionResult<ExitStatus> {
    tracing::info!("{}", invocation.command_line());

    let env = invocation.env.process_env();
    Command::new(&invocation.program)
        .args(&invocation.args)
        .env_clear()
        .envs(&env)
        .status()
        .map_err(|source| CaptionError::Spawn {
            program: invocation.program.clone(),
            source,
        })
}
