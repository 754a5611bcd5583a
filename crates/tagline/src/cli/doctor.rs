//! The `tagline doctor` command: host environment checks.

use clap::Args;
use tagline_core::{platform, Config};

/// Arguments for the `doctor` command.
#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Skip the accelerator cache release
    #[arg(long)]
    pub no_release: bool,
}

/// Execute the doctor command.
pub fn execute(args: DoctorArgs) -> anyhow::Result<()> {
    let config = Config::load()?;

    println!("Host environment:");
    let notebook = if platform::is_notebook_host() {
        "hosted notebook"
    } else {
        "regular host"
    };
    println!("  - Platform: {notebook}");

    let script_path = config.script_path();
    let script_status = if script_path.exists() {
        "found"
    } else {
        "not found"
    };
    println!(
        "  - Tagger script: {} ({})",
        script_path.display(),
        script_status
    );

    if !args.no_release {
        println!("  - Requesting accelerator cache release...");
        platform::release_accelerator_memory();
    }

    Ok(())
}
