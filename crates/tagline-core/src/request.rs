//! The caption request record consumed by the command assembler.

use std::path::PathBuf;

use crate::config::CaptionDefaults;

/// One batch-captioning run, fully described.
///
/// Built from persisted defaults plus per-run overrides immediately before
/// invocation, and consumed once. The request itself is never persisted;
/// remembering prior values is the config layer's job.
#[derive(Debug, Clone)]
pub struct CaptionRequest {
    /// Image folder to caption
    pub source_dir: PathBuf,

    /// Extension for caption files (e.g. ".txt")
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

    /// Tags forced to the front of each caption file after the run.
    /// Not passed to the tagger; applied by the post-processing pass.
    pub always_first_tags: String,

    /// Tag replacement rules (`source1,target1;source2,target2`)
    pub tag_replacement: String,
}

impl CaptionRequest {
    /// Build a request for `source_dir` from persisted defaults.
    ///
    /// Callers override individual fields afterwards.
    pub fn from_defaults(source_dir: impl Into<PathBuf>, defaults: &CaptionDefaults) -> Self {
        Self {
            source_dir: source_dir.into(),
            caption_extension: defaults.caption_extension.clone(),
            caption_separator: defaults.caption_separator.clone(),
            repo_id: defaults.repo_id.clone(),
            batch_size: defaults.batch_size,
            max_data_loader_workers: defaults.max_data_loader_workers,
            general_threshold: defaults.general_threshold,
            character_threshold: defaults.character_threshold,
            confidence_threshold: defaults.confidence_threshold,
            recursive: defaults.recursive,
            debug: defaults.debug,
            onnx: defaults.onnx,
            append_tags: defaults.append_tags,
            force_download: defaults.force_download,
            frequency_tags: defaults.frequency_tags,
            character_tag_expand: defaults.character_tag_expand,
            use_rating_tags: defaults.use_rating_tags,
            use_rating_tags_as_last_tag: defaults.use_rating_tags_as_last_tag,
            remove_underscore: defaults.remove_underscore,
            undesired_tags: defaults.undesired_tags.clone(),
            always_first_tags: defaults.always_first_tags.clone(),
            tag_replacement: defaults.tag_replacement.clone(),
        }
    }
}
