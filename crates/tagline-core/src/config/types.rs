//! Sub-configuration structs with defaults matching the stock tagger form.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// External tagger installation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Root of the tagger checkout. The tagger script and the two
    /// interpreter search-path segments are derived from this directory.
    pub script_dir: PathBuf,

    /// Launcher binary used to start the tagger
    pub launcher: String,

    /// Arguments passed to the launcher before the script path
    pub launcher_args: Vec<String>,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            script_dir: PathBuf::from("~/kohya_ss"),
            launcher: "accelerate".to_string(),
            launcher_args: vec!["launch".to_string()],
        }
    }
}

/// Persisted defaults for caption options.
///
/// These are the form's "prior values": every field of a caption request
/// except the image folder itself. CLI flags override them per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionDefaults {
    /// Extension for caption files (e.g. ".txt", ".caption")
    pub caption_extension: String,

    /// Separator between tags inside a caption file
    pub caption_separator: String,

    /// Repository identifier of the pretrained tagger model
    pub repo_id: String,

    /// Inference batch size
    pub batch_size: u32,

    /// Data loader worker count
    pub max_data_loader_workers: u32,

    /// Confidence cutoff for general tags
    pub general_threshold: f64,

    /// Confidence cutoff for character tags
    pub character_threshold: f64,

    /// Overall confidence cutoff
    pub confidence_threshold: f64,

    /// Tag images in subfolders as well
    pub recursive: bool,

    /// Tagger debug mode
    pub debug: bool,

    /// Use the ONNX runtime for inference
    pub onnx: bool,

    /// Append tags to existing captions instead of replacing them
    pub append_tags: bool,

    /// Force model re-download
    pub force_download: bool,

    /// Show tag frequency statistics
    pub frequency_tags: bool,

    /// Expand `chara_name_(series)` into `chara_name, series`
    pub character_tag_expand: bool,

    /// Add rating tags as the first tag
    pub use_rating_tags: bool,

    /// Add rating tags as the last tag
    pub use_rating_tags_as_last_tag: bool,

    /// Replace underscores with spaces in output tags
    pub remove_underscore: bool,

    /// Comma-separated tags to drop from the output
    pub undesired_tags: String,

    /// Tags forced to the front of each caption file after the run
    pub always_first_tags: String,

    /// Tag replacement rules (`source1,target1;source2,target2`)
    pub tag_replacement: String,
}

impl Default for CaptionDefaults {
    fn default() -> Self {
        Self {
            caption_extension: ".txt".to_string(),
            caption_separator: ", ".to_string(),
            repo_id: "SmilingWolf/wd-v1-4-convnextv2-tagger-v2".to_string(),
            batch_size: 1,
            max_data_loader_workers: 2,
            general_threshold: 0.35,
            character_threshold: 0.35,
            confidence_threshold: 0.35,
            recursive: false,
            debug: true,
            onnx: true,
            append_tags: false,
            force_download: false,
            frequency_tags: true,
            character_tag_expand: false,
            use_rating_tags: false,
            use_rating_tags_as_last_tag: false,
            remove_underscore: true,
            undesired_tags: String::new(),
            always_first_tags: String::new(),
            tag_replacement: String::new(),
        }
    }
}

/// What to do when the tagger exits with a non-zero status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and proceed to caption post-processing
    #[default]
    Continue,

    /// Surface the failure and skip post-processing
    Abort,
}

/// Execution settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Policy applied to a non-zero tagger exit status
    pub on_failure: FailurePolicy,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
