//! Tagline Core - Embeddable front-end for WD14-style batch captioning.
//!
//! Tagline collects caption options, assembles the external tagger's command
//! line and environment, runs the tagger as a blocking child process, and
//! post-processes the produced caption files.
//!
//! # Architecture
//!
//! ```text
//! CaptionRequest → validate → assemble (argv + env overlay)
//!                → launch tagger (blocking, inherited stdio)
//!                → apply always-first tags to caption files
//! ```
//!
//! The captioning computation itself belongs to the external tagger script;
//! this crate owns everything around that call.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tagline_core::{CaptionRequest, Captioner, Config};
//!
//! fn main() -> tagline_core::Result<()> {
//!     let config = Config::load()?;
//!     let request = CaptionRequest::from_defaults("./imgs", &config.caption);
//!     let captioner = Captioner::new(config);
//!     let summary = captioner.run(&request)?;
//!     println!("updated {} caption file(s)", summary.files_updated);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod affix;
pub mod config;
pub mod error;
pub mod invoke;
pub mod platform;
pub mod request;

// Re-exports for convenient access
pub use affix::AffixOptions;
pub use config::{Config, FailurePolicy};
pub use error::{CaptionError, CaptionResult, ConfigError, Result, TaglineError};
pub use invoke::{assemble, EnvOverlay, Invocation, DEFAULT_THRESHOLD};
pub use request::CaptionRequest;

use std::process::ExitStatus;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What a completed captioning run looked like.
#[derive(Debug)]
pub struct CaptionSummary {
    /// Exit status of the tagger process
    pub status: ExitStatus,

    /// Caption files rewritten by the always-first-tags pass
    pub files_updated: usize,
}

/// Captioner - the main entry point for running a captioning pass.
pub struct Captioner {
    config: Config,
}

impl Captioner {
    /// Create a new captioner with the given configuration.
    pub fn new(config: Config) -> Self {
        tracing::debug!("Initializing tagline v{}", VERSION);
        Self { config }
    }

    /// Create a new captioner with configuration from the default location.
    pub fn with_defaults() -> Result<Self> {
        let config = Config::load()?;
        Ok(Self::new(config))
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Assemble the tagger invocation for a request without executing it.
    pub fn assemble(&self, request: &CaptionRequest) -> CaptionResult<Invocation> {
        invoke::assemble(request, &self.config)
    }

    /// Run a full captioning pass: assemble, launch the tagger, wait for it,
    /// then apply the always-first tags to the produced caption files.
    ///
    /// Under [`FailurePolicy::Continue`] a failed tagger run is logged and
    /// post-processing still happens; under [`FailurePolicy::Abort`] it is
    /// surfaced as [`CaptionError::TaggerFailed`] and post-processing is
    /// skipped.
    pub fn run(&self, request: &CaptionRequest) -> Result<CaptionSummary> {
        let invocation = self.assemble(request)?;

        tracing::info!("Captioning files in {}...", request.source_dir.display());
        let status = invoke::runner::execute(&invocation)?;

        if !status.success() {
            match self.config.execution.on_failure {
                FailurePolicy::Continue => {
                    tracing::warn!(
                        "Tagger exited with {status}; continuing with caption post-processing"
                    );
                }
                FailurePolicy::Abort => {
                    return Err(CaptionError::TaggerFailed { status }.into());
                }
            }
        }

        let options = AffixOptions::prefix(request.always_first_tags.clone());
        let files_updated =
            affix::apply_affixes(&request.source_dir, &request.caption_extension, &options)?;
        if files_updated > 0 {
            tracing::info!("Applied always-first tags to {files_updated} caption file(s)");
        }

        tracing::info!("...captioning done");
        Ok(CaptionSummary {
            status,
            files_updated,
        })
    }
}
