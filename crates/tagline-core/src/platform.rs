//! Host-platform utilities: accelerator cache release and hosted-notebook
//! detection.
//!
//! Both operations are best-effort. They never return errors and never
//! panic; an unavailable runtime degrades to a no-op.

use std::process::{Command, Stdio};

/// Environment markers set by the hosted-notebook platform.
const NOTEBOOK_MARKERS: &[&str] = &["COLAB_RELEASE_TAG", "COLAB_JUPYTER_IP", "COLAB_GPU"];

/// Snippet handed to the Python runtime the tagger stack ships with:
/// drop the accelerator cache, then run a collection pass.
const RELEASE_SNIPPET: &str = "import gc\n\
try:\n\
    import torch\n\
    torch.cuda.empty_cache()\n\
except Exception:\n\
    pass\n\
gc.collect()\n";

/// Ask the accelerator runtime to release cached memory, then request a
/// general reclamation pass.
///
/// Realized through the Python runtime already required by the tagger.
/// Every failure mode — interpreter missing, torch missing, no accelerator —
/// is swallowed; the outcome is only visible at debug level.
pub fn release_accelerator_memory() {
    let outcome = Command::new("python")
        .args(["-c", RELEASE_SNIPPET])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match outcome {
        Ok(status) if status.success() => {
            tracing::debug!("Accelerator cache release requested");
        }
        Ok(status) => {
            tracing::debug!("Accelerator cache release exited with {status}");
        }
        Err(e) => {
            tracing::debug!("Accelerator runtime unavailable: {e}");
        }
    }
}

/// Returns true when the process runs inside the hosted-notebook platform.
///
/// Detection is capability-based: any of the platform's environment markers
/// present and non-empty. Never fails.
pub fn is_notebook_host() -> bool {
    detect_notebook_host(|name| std::env::var(name).ok())
}

fn detect_notebook_host(lookup: impl Fn(&str) -> Option<String>) -> bool {
    NOTEBOOK_MARKERS
        .iter()
        .any(|marker| lookup(marker).is_some_and(|value| !value.is_empty()))
}
