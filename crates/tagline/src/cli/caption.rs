//! The `tagline caption` command: the option form, as flags.
//!
//! Every caption option has a flag; anything not given falls back to the
//! persisted `[caption]` config defaults. Booleans that default to on in the
//! stock form are exposed as `--no-*` negations.

use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tagline_core::{CaptionRequest, Captioner, Config, FailurePolicy};

/// Output format for `--dry-run`.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum DryRunFormat {
    /// Rendered command line plus environment overlay
    #[default]
    Text,
    /// The full invocation as a JSON object
    Json,
}

/// Arguments for the `caption` command.
#[derive(Args, Debug)]
pub struct CaptionArgs {
    /// Image folder to caption (containing the images to caption)
    #[arg(required = true)]
    pub source_dir: PathBuf,

    /// Extension for caption files (e.g. ".caption", ".txt")
    #[arg(long)]
    pub caption_extension: Option<String>,

    /// Separator between tags in a caption file
    #[arg(long)]
    pub caption_separator: Option<String>,

    /// Repo id of the tagger model
    #[arg(long)]
    pub repo_id: Option<String>,

    /// Inference batch size
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// Max dataloader workers
    #[arg(long)]
    pub max_data_loader_workers: Option<u32>,

    /// Threshold of confidence to add a tag
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Threshold of confidence for general tags
    #[arg(long)]
    pub general_threshold: Option<f64>,

    /// Threshold of confidence for character tags
    #[arg(long)]
    pub character_threshold: Option<f64>,

    /// Tag subfolder images as well
    #[arg(long)]
    pub recursive: bool,

    /// Append tags to existing captions instead of replacing them
    #[arg(long)]
    pub append_tags: bool,

    /// Force model re-download
    #[arg(long)]
    pub force_download: bool,

    /// Expand `chara_name_(series)` into `chara_name, series`
    #[arg(long)]
    pub character_tag_expand: bool,

    /// Add rating tags as the first tag
    #[arg(long)]
    pub use_rating_tags: bool,

    /// Add rating tags as the last tag
    #[arg(long)]
    pub use_rating_tags_as_last_tag: bool,

    /// Don't use the ONNX runtime
    #[arg(long)]
    pub no_onnx: bool,

    /// Keep underscores in the output tags
    #[arg(long)]
    pub no_remove_underscore: bool,

    /// Disable tagger debug mode
    #[arg(long)]
    pub no_debug: bool,

    /// Don't show tag frequency statistics
    #[arg(long)]
    pub no_frequency_tags: bool,

    /// Comma-separated tags to drop from the output
    #[arg(long)]
    pub undesired_tags: Option<String>,

    /// Tags to always put at the beginning of each caption
    #[arg(long)]
    pub always_first_tags: Option<String>,

    /// Tag replacement rules (`source1,target1;source2,target2`)
    #[arg(long)]
    pub tag_replacement: Option<String>,

    /// Treat a failed tagger run as an error instead of continuing
    #[arg(long)]
    pub abort_on_failure: bool,

    /// Print the assembled invocation without running the tagger
    #[arg(long)]
    pub dry_run: bool,

    /// Output format for --dry-run
    #[arg(long, value_enum, default_value = "text")]
    pub format: DryRunFormat,
}

/// Manual Default impl for constructing CaptionArgs outside of clap.
///
/// Values match the clap `#[arg(default_value = ...)]` annotations above.
/// Used by tests building args field-by-field.
impl Default for CaptionArgs {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::new(),
            caption_extension: None,
            caption_separator: None,
            repo_id: None,
            batch_size: None,
            max_data_loader_workers: None,
            threshold: None,
            general_threshold: None,
            character_threshold: None,
            recursive: false,
            append_tags: false,
            force_download: false,
            character_tag_expand: false,
            use_rating_tags: false,
            use_rating_tags_as_last_tag: false,
            no_onnx: false,
            no_remove_underscore: false,
            no_debug: false,
            no_frequency_tags: false,
            undesired_tags: None,
            always_first_tags: None,
            tag_replacement: None,
            abort_on_failure: false,
            dry_run: false,
            format: DryRunFormat::Text,
        }
    }
}

/// Merge CLI flags over the persisted config defaults into a request.
///
/// Flags given on the command line win; default-on booleans are turned off
/// by their `--no-*` negation, default-off booleans are turned on by their
/// positive flag.
fn build_request(args: &CaptionArgs, config: &Config) -> CaptionRequest {
    let mut request = CaptionRequest::from_defaults(&args.source_dir, &config.caption);

    if let Some(ref ext) = args.caption_extension {
        request.caption_extension = ext.clone();
    }
    if let Some(ref sep) = args.caption_separator {
        request.caption_separator = sep.clone();
    }
    if let Some(ref repo) = args.repo_id {
        request.repo_id = repo.clone();
    }
    if let Some(batch_size) = args.batch_size {
        request.batch_size = batch_size;
    }
    if let Some(workers) = args.max_data_loader_workers {
        request.max_data_loader_workers = workers;
    }
    if let Some(threshold) = args.threshold {
        request.confidence_threshold = threshold;
    }
    if let Some(threshold) = args.general_threshold {
        request.general_threshold = threshold;
    }
    if let Some(threshold) = args.character_threshold {
        request.character_threshold = threshold;
    }

    request.recursive |= args.recursive;
    request.append_tags |= args.append_tags;
    request.force_download |= args.force_download;
    request.character_tag_expand |= args.character_tag_expand;
    request.use_rating_tags |= args.use_rating_tags;
    request.use_rating_tags_as_last_tag |= args.use_rating_tags_as_last_tag;

    request.onnx &= !args.no_onnx;
    request.remove_underscore &= !args.no_remove_underscore;
    request.debug &= !args.no_debug;
    request.frequency_tags &= !args.no_frequency_tags;

    if let Some(ref tags) = args.undesired_tags {
        request.undesired_tags = tags.clone();
    }
    if let Some(ref tags) = args.always_first_tags {
        request.always_first_tags = tags.clone();
    }
    if let Some(ref rules) = args.tag_replacement {
        request.tag_replacement = rules.clone();
    }

    request
}

/// Execute the caption command.
pub fn execute(args: CaptionArgs) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if args.abort_on_failure {
        config.execution.on_failure = FailurePolicy::Abort;
    }

    let request = build_request(&args, &config);
    let captioner = Captioner::new(config);

    if args.dry_run {
        let invocation = captioner.assemble(&request)?;
        match args.format {
            DryRunFormat::Text => {
                println!("{}", invocation.command_line());
                println!(
                    "{}: prepend {}",
                    tagline_core::invoke::SEARCH_PATH_VAR,
                    invocation
                        .env
                        .search_paths
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                for (key, value) in &invocation.env.vars {
                    println!("{key}={value}");
                }
            }
            DryRunFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&invocation)?);
            }
        }
        return Ok(());
    }

    if !request.source_dir.exists() {
        anyhow::bail!(
            "Image folder does not exist: {:?}\n\n  Hint: Check the folder path and try again.",
            request.source_dir
        );
    }

    let summary = captioner.run(&request)?;
    tracing::debug!("Tagger exit status: {}", summary.status);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(dir: &str) -> CaptionArgs {
        CaptionArgs {
            source_dir: PathBuf::from(dir),
            ..CaptionArgs::default()
        }
    }

    #[test]
    fn bare_args_inherit_config_defaults() {
        let config = Config::default();
        let request = build_request(&args_for("/data/imgs"), &config);

        assert_eq!(request.source_dir, PathBuf::from("/data/imgs"));
        assert_eq!(request.caption_extension, ".txt");
        assert_eq!(request.batch_size, 1);
        assert!(request.onnx);
        assert!(request.remove_underscore);
        assert!(!request.recursive);
    }

    #[test]
    fn flags_override_config_defaults() {
        let config = Config::default();
        let mut args = args_for("/data/imgs");
        args.batch_size = Some(8);
        args.repo_id = Some("SmilingWolf/wd-vit-tagger-v3".to_string());
        args.threshold = Some(0.5);
        args.undesired_tags = Some("solo".to_string());

        let request = build_request(&args, &config);

        assert_eq!(request.batch_size, 8);
        assert_eq!(request.repo_id, "SmilingWolf/wd-vit-tagger-v3");
        assert_eq!(request.confidence_threshold, 0.5);
        assert_eq!(request.undesired_tags, "solo");
    }

    #[test]
    fn positive_flags_enable_default_off_booleans() {
        let config = Config::default();
        let mut args = args_for("/data/imgs");
        args.recursive = true;
        args.use_rating_tags = true;

        let request = build_request(&args, &config);

        assert!(request.recursive);
        assert!(request.use_rating_tags);
        assert!(!request.append_tags);
    }

    #[test]
    fn negation_flags_disable_default_on_booleans() {
        let config = Config::default();
        let mut args = args_for("/data/imgs");
        args.no_onnx = true;
        args.no_frequency_tags = true;

        let request = build_request(&args, &config);

        assert!(!request.onnx);
        assert!(!request.frequency_tags);
        assert!(request.remove_underscore);
        assert!(request.debug);
    }

    #[test]
    fn config_edits_survive_without_flags() {
        let mut config = Config::default();
        config.caption.onnx = false;
        config.caption.recursive = true;

        let request = build_request(&args_for("/data/imgs"), &config);

        assert!(!request.onnx);
        assert!(request.recursive);
    }
}
