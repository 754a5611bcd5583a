//! Assembly and execution of the external tagger invocation.
//!
//! `assemble` is a pure mapping from a [`CaptionRequest`] to an
//! [`Invocation`]: the launcher program, its argument tokens, and the
//! environment overlay. It touches neither the filesystem nor the network,
//! and it never spawns anything — execution lives in [`runner`].

mod env;
pub mod runner;

pub use env::{EnvOverlay, SEARCH_PATH_VAR};

use serde::Serialize;

use crate::config::Config;
use crate::error::{CaptionError, CaptionResult};
use crate::request::CaptionRequest;

/// Documented default confidence cutoff. Threshold flags are emitted only
/// for values different from this — the "only pass non-default values"
/// policy, keyed to the exact literal.
pub const DEFAULT_THRESHOLD: f64 = 0.35;

/// A fully assembled tagger invocation, ready to execute.
#[derive(Debug, Clone, Serialize)]
pub struct Invocation {
    /// Launcher program (e.g. `accelerate`)
    pub program: String,

    /// Argument tokens, in emission order, ending with the image folder
    pub args: Vec<String>,

    /// Environment changes merged over the caller's environment at spawn
    pub env: EnvOverlay,
}

impl Invocation {
    /// Render the invocation as a single command line for logging.
    ///
    /// Tokens containing whitespace are double-quoted for readability; the
    /// child receives the unquoted tokens directly.
    pub fn command_line(&self) -> String {
        let mut rendered = quote_token(&self.program);
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&quote_token(arg));
        }
        rendered
    }
}

fn quote_token(token: &str) -> String {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        format!("\"{token}\"")
    } else {
        token.to_string()
    }
}

/// Translate a caption request into a tagger invocation.
///
/// Fails fast on an empty image folder or caption extension, before any
/// token or overlay is produced. Boolean flags are emitted only when true,
/// thresholds only when different from [`DEFAULT_THRESHOLD`], and string
/// overrides only when non-empty. `always_first_tags` is deliberately not
/// an argument; the post-processing pass applies it after the run.
pub fn assemble(request: &CaptionRequest, config: &Config) -> CaptionResult<Invocation> {
    if request.source_dir.as_os_str().is_empty() {
        return Err(CaptionError::MissingSourceDir);
    }
    if request.caption_extension.is_empty() {
        return Err(CaptionError::MissingCaptionExtension);
    }

    let mut args: Vec<String> = config.tagger.launcher_args.clone();
    args.push(config.script_path().to_string_lossy().into_owned());

    if request.append_tags {
        args.push("--append_tags".to_string());
    }
    args.push(format!("--batch_size={}", request.batch_size));
    args.push(format!("--caption_extension={}", request.caption_extension));
    args.push(format!("--caption_separator={}", request.caption_separator));
    if request.character_tag_expand {
        args.push("--character_tag_expand".to_string());
    }
    if request.character_threshold != DEFAULT_THRESHOLD {
        args.push(format!(
            "--character_threshold={}",
            request.character_threshold
        ));
    }
    if request.debug {
        args.push("--debug".to_string());
    }
    if request.force_download {
        args.push("--force_download".to_string());
    }
    if request.frequency_tags {
        args.push("--frequency_tags".to_string());
    }
    if request.general_threshold != DEFAULT_THRESHOLD {
        args.push(format!("--general_threshold={}", request.general_threshold));
    }
    args.push(format!(
        "--max_data_loader_n_workers={}",
        request.max_data_loader_workers
    ));
    if request.onnx {
        args.push("--onnx".to_string());
    }
    if request.recursive {
        args.push("--recursive".to_string());
    }
    if request.remove_underscore {
        args.push("--remove_underscore".to_string());
    }
    args.push(format!("--repo_id={}", request.repo_id));
    if !request.tag_replacement.is_empty() {
        args.push(format!("--tag_replacement={}", request.tag_replacement));
    }
    if request.confidence_threshold != DEFAULT_THRESHOLD {
        args.push(format!("--thresh={}", request.confidence_threshold));
    }
    if !request.undesired_tags.is_empty() {
        args.push(format!("--undesired_tags={}", request.undesired_tags));
    }
    if request.use_rating_tags {
        args.push("--use_rating_tags".to_string());
    }
    if request.use_rating_tags_as_last_tag {
        args.push("--use_rating_tags_as_last_tag".to_string());
    }
    args.push(request.source_dir.to_string_lossy().into_owned());

    Ok(Invocation {
        program: config.tagger.launcher.clone(),
        args,
        env: EnvOverlay::for_tagger(config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// A request with every optional knob at its neutral value: all booleans
    /// false, thresholds at the default, optional strings empty.
    fn bare_request() -> CaptionRequest {
        CaptionRequest {
            source_dir: PathBuf::from("/data/imgs"),
            caption_extension: ".txt".to_string(),
            caption_separator: ", ".to_string(),
            repo_id: "X".to_string(),
            batch_size: 4,
            max_data_loader_workers: 2,
            general_threshold: DEFAULT_THRESHOLD,
            character_threshold: DEFAULT_THRESHOLD,
            confidence_threshold: DEFAULT_THRESHOLD,
            recursive: false,
            debug: false,
            onnx: false,
            append_tags: false,
            force_download: false,
            frequency_tags: false,
            character_tag_expand: false,
            use_rating_tags: false,
            use_rating_tags_as_last_tag: false,
            remove_underscore: false,
            undesired_tags: String::new(),
            always_first_tags: String::new(),
            tag_replacement: String::new(),
        }
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.tagger.script_dir = PathBuf::from("/opt/kohya");
        config
    }

    const BOOLEAN_FLAGS: &[(&str, fn(&mut CaptionRequest))] = &[
        ("--append_tags", |r| r.append_tags = true),
        ("--character_tag_expand", |r| r.character_tag_expand = true),
        ("--debug", |r| r.debug = true),
        ("--force_download", |r| r.force_download = true),
        ("--frequency_tags", |r| r.frequency_tags = true),
        ("--onnx", |r| r.onnx = true),
        ("--recursive", |r| r.recursive = true),
        ("--remove_underscore", |r| r.remove_underscore = true),
        ("--use_rating_tags", |r| r.use_rating_tags = true),
        ("--use_rating_tags_as_last_tag", |r| {
            r.use_rating_tags_as_last_tag = true
        }),
    ];

    #[test]
    fn rejects_empty_source_dir() {
        let mut request = bare_request();
        request.source_dir = PathBuf::new();
        let err = assemble(&request, &test_config()).unwrap_err();
        assert!(matches!(err, CaptionError::MissingSourceDir));
    }

    #[test]
    fn rejects_empty_caption_extension() {
        let mut request = bare_request();
        request.caption_extension = String::new();
        let err = assemble(&request, &test_config()).unwrap_err();
        assert!(matches!(err, CaptionError::MissingCaptionExtension));
    }

    #[test]
    fn empty_source_dir_rejected_even_with_empty_extension() {
        // Both preconditions violated: the folder check fires first.
        let mut request = bare_request();
        request.source_dir = PathBuf::new();
        request.caption_extension = String::new();
        let err = assemble(&request, &test_config()).unwrap_err();
        assert!(matches!(err, CaptionError::MissingSourceDir));
    }

    #[test]
    fn default_thresholds_emit_no_threshold_flags() {
        let invocation = assemble(&bare_request(), &test_config()).unwrap();
        for arg in &invocation.args {
            assert!(!arg.starts_with("--general_threshold"), "found {arg}");
            assert!(!arg.starts_with("--character_threshold"), "found {arg}");
            assert!(!arg.starts_with("--thresh="), "found {arg}");
        }
    }

    #[test]
    fn non_default_character_threshold_is_emitted() {
        let mut request = bare_request();
        request.character_threshold = 0.5;
        let invocation = assemble(&request, &test_config()).unwrap();
        assert!(invocation
            .args
            .contains(&"--character_threshold=0.5".to_string()));
    }

    #[test]
    fn non_default_general_and_confidence_thresholds_are_emitted() {
        let mut request = bare_request();
        request.general_threshold = 0.2;
        request.confidence_threshold = 0.75;
        let invocation = assemble(&request, &test_config()).unwrap();
        assert!(invocation
            .args
            .contains(&"--general_threshold=0.2".to_string()));
        assert!(invocation.args.contains(&"--thresh=0.75".to_string()));
    }

    #[test]
    fn all_booleans_false_emits_no_boolean_flags() {
        let invocation = assemble(&bare_request(), &test_config()).unwrap();
        for (flag, _) in BOOLEAN_FLAGS {
            assert!(
                !invocation.args.iter().any(|a| a == flag),
                "unexpected {flag}"
            );
        }
    }

    #[test]
    fn each_boolean_adds_exactly_its_own_flag() {
        let baseline = assemble(&bare_request(), &test_config()).unwrap();
        for (flag, set) in BOOLEAN_FLAGS {
            let mut request = bare_request();
            set(&mut request);
            let invocation = assemble(&request, &test_config()).unwrap();

            assert!(invocation.args.iter().any(|a| a == flag), "missing {flag}");
            assert_eq!(
                invocation.args.len(),
                baseline.args.len() + 1,
                "{flag} added more than itself"
            );
            for (other, _) in BOOLEAN_FLAGS.iter().filter(|(f, _)| f != flag) {
                assert!(
                    !invocation.args.iter().any(|a| a == other),
                    "{flag} dragged in {other}"
                );
            }
        }
    }

    #[test]
    fn string_overrides_gate_on_non_empty() {
        let mut request = bare_request();
        request.undesired_tags = "1girl,solo".to_string();
        request.tag_replacement = "tag1,tag2;tag3,tag4".to_string();
        let invocation = assemble(&request, &test_config()).unwrap();
        assert!(invocation
            .args
            .contains(&"--undesired_tags=1girl,solo".to_string()));
        assert!(invocation
            .args
            .contains(&"--tag_replacement=tag1,tag2;tag3,tag4".to_string()));
    }

    #[test]
    fn always_first_tags_is_never_an_argument() {
        let mut request = bare_request();
        request.always_first_tags = "1girl, masterpiece".to_string();
        let invocation = assemble(&request, &test_config()).unwrap();
        assert!(!invocation
            .args
            .iter()
            .any(|a| a.contains("always_first_tags")));
    }

    #[test]
    fn bare_request_token_order_matches_contract() {
        let invocation = assemble(&bare_request(), &test_config()).unwrap();
        assert_eq!(invocation.program, "accelerate");
        assert_eq!(
            invocation.args,
            vec![
                "launch".to_string(),
                "/opt/kohya/sd-scripts/finetune/tag_images_by_wd14_tagger.py".to_string(),
                "--batch_size=4".to_string(),
                "--caption_extension=.txt".to_string(),
                "--caption_separator=, ".to_string(),
                "--max_data_loader_n_workers=2".to_string(),
                "--repo_id=X".to_string(),
                "/data/imgs".to_string(),
            ]
        );
    }

    #[test]
    fn source_dir_is_always_the_trailing_token() {
        let mut request = bare_request();
        request.use_rating_tags_as_last_tag = true;
        request.undesired_tags = "solo".to_string();
        let invocation = assemble(&request, &test_config()).unwrap();
        assert_eq!(invocation.args.last().unwrap(), "/data/imgs");
    }

    #[test]
    fn command_line_quotes_tokens_with_whitespace() {
        let invocation = assemble(&bare_request(), &test_config()).unwrap();
        let rendered = invocation.command_line();
        assert!(rendered.starts_with("accelerate launch "));
        assert!(rendered.contains("\"--caption_separator=, \""));
        assert!(rendered.ends_with("/data/imgs"));
    }
}
