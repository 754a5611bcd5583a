//! The `tagline models` command for inspecting known tagger models.

use clap::{Args, Subcommand};
use tagline_core::Config;

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model inspection.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// List known tagger repository identifiers
    List,
}

/// Repository identifiers the tagger is known to accept.
///
/// Downloading and caching the model weights is the tagger's own job; pass
/// `--force-download` to `tagline caption` to make it re-fetch.
pub const KNOWN_REPO_IDS: &[&str] = &[
    "SmilingWolf/wd-v1-4-convnext-tagger-v2",
    "SmilingWolf/wd-v1-4-convnextv2-tagger-v2",
    "SmilingWolf/wd-v1-4-vit-tagger-v2",
    "SmilingWolf/wd-v1-4-swinv2-tagger-v2",
    "SmilingWolf/wd-v1-4-moat-tagger-v2",
    "SmilingWolf/wd-swinv2-tagger-v3",
    "SmilingWolf/wd-vit-tagger-v3",
    "SmilingWolf/wd-convnext-tagger-v3",
];

/// Execute the models command.
pub fn execute(args: ModelsArgs) -> anyhow::Result<()> {
    let config = Config::load()?;

    match args.command {
        ModelsCommand::List => {
            println!("Known tagger models:");
            let mut configured_is_known = false;
            for repo_id in KNOWN_REPO_IDS {
                let default_marker = if *repo_id == config.caption.repo_id {
                    configured_is_known = true;
                    "  (default)"
                } else {
                    ""
                };
                println!("  - {repo_id}{default_marker}");
            }
            if !configured_is_known {
                println!(
                    "\n  Configured default is not in this list: {}",
                    config.caption.repo_id
                );
            }
            println!("\nAny repository the tagger accepts works via `caption --repo-id`.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_default_repo_is_known() {
        let config = Config::default();
        assert!(KNOWN_REPO_IDS.contains(&config.caption.repo_id.as_str()));
    }
}
