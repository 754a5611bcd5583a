//! Caption file post-processing: prefix/postfix application.
//!
//! After a tagger run, caption files can be rewritten with a fixed leading
//! tag string (and optionally a trailing one). The scan covers caption files
//! directly inside the folder — it does not descend into subfolders.

use std::path::Path;
use walkdir::WalkDir;

use crate::error::{CaptionError, CaptionResult};

/// Text to merge into each caption file.
#[derive(Debug, Clone)]
pub struct AffixOptions {
    /// Tags placed at the front of the caption
    pub prefix: String,

    /// Tags placed at the end of the caption
    pub postfix: String,

    /// Separator inserted between non-empty parts
    pub separator: String,
}

impl Default for AffixOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            postfix: String::new(),
            separator: ", ".to_string(),
        }
    }
}

impl AffixOptions {
    /// Options that put `prefix` at the front of each caption.
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// True when there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.postfix.is_empty()
    }
}

/// Rewrite every caption file of `caption_extension` directly inside `dir`,
/// merging in the affixes. Returns the number of files rewritten.
///
/// With both affixes empty this is a no-op: nothing is scanned or touched.
pub fn apply_affixes(
    dir: &Path,
    caption_extension: &str,
    options: &AffixOptions,
) -> CaptionResult<usize> {
    if options.is_empty() {
        return Ok(0);
    }

    let wanted = caption_extension.trim_start_matches('.');
    let mut files: Vec<_> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path().is_file()
                && e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == wanted)
        })
        .map(|e| e.into_path())
        .collect();

    // Sort by path for deterministic ordering
    files.sort();

    let mut rewritten = 0;
    for path in files {
        let content = std::fs::read_to_string(&path).map_err(|source| CaptionError::Rewrite {
            path: path.clone(),
            source,
        })?;
        let merged = merge(&content, options);
        std::fs::write(&path, merged).map_err(|source| CaptionError::Rewrite {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Rewrote {}", path.display());
        rewritten += 1;
    }

    Ok(rewritten)
}

/// Merge affixes around the existing caption text.
///
/// Trailing whitespace of the original content is trimmed; the separator
/// appears only between two non-empty sides.
fn merge(content: &str, options: &AffixOptions) -> String {
    let content = content.trim_end();

    let mut merged = String::new();
    merged.push_str(&options.prefix);
    if !options.prefix.is_empty() && !content.is_empty() {
        merged.push_str(&options.separator);
    }
    merged.push_str(content);
    if !options.postfix.is_empty() && !merged.is_empty() {
        merged.push_str(&options.separator);
    }
    merged.push_str(&options.postfix);
    merged
}
