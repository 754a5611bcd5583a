//! Process-environment overlay for the tagger child process.
//!
//! The overlay is a plain value describing what the child environment must
//! look like. It is merged over a snapshot of the caller's environment; the
//! caller's own environment is never mutated.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::Config;

/// Environment variable holding the interpreter's module search path.
pub const SEARCH_PATH_VAR: &str = "PYTHONPATH";

/// Platform separator for path-list environment variables.
const PATH_LIST_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Environment changes required by the tagger.
#[derive(Debug, Clone, Serialize)]
pub struct EnvOverlay {
    /// Segments prepended to the module search path, in order
    pub search_paths: Vec<PathBuf>,

    /// Variables forced to fixed values
    pub vars: Vec<(String, String)>,
}

impl EnvOverlay {
    /// Build the overlay the tagger script needs: the checkout root and its
    /// `sd-scripts` subdirectory on the module search path, and the oneDNN
    /// optimization flag forced off.
    pub fn for_tagger(config: &Config) -> Self {
        let script_dir = config.script_dir();
        Self {
            search_paths: vec![script_dir.clone(), script_dir.join("sd-scripts")],
            vars: vec![("TF_ENABLE_ONEDNN_OPTS".to_string(), "0".to_string())],
        }
    }

    /// Merge the overlay over a base environment, returning the child's
    /// environment. Any pre-existing search path is kept as a suffix.
    pub fn merged_over(&self, mut base: BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut segments: Vec<String> = self
            .search_paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        if let Some(existing) = base.get(SEARCH_PATH_VAR) {
            if !existing.is_empty() {
                segments.push(existing.clone());
            }
        }
        let mut joined = String::new();
        for segment in &segments {
            if !joined.is_empty() {
                joined.push(PATH_LIST_SEPARATOR);
            }
            joined.push_str(segment);
        }
        base.insert(SEARCH_PATH_VAR.to_string(), joined);

        for (key, value) in &self.vars {
            base.insert(key.clone(), value.clone());
        }
        base
    }

    /// Merge the overlay over a snapshot of the current process environment.
    pub fn process_env(&self) -> BTreeMap<String, String> {
        let base = std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect();
        self.merged_over(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> EnvOverlay {
        let mut config = Config::default();
        config.tagger.script_dir = PathBuf::from("/opt/kohya");
        EnvOverlay::for_tagger(&config)
    }

    #[test]
    fn overlay_prepends_both_segments() {
        let env = overlay().merged_over(BTreeMap::new());
        assert_eq!(
            env.get(SEARCH_PATH_VAR).unwrap(),
            "/opt/kohya:/opt/kohya/sd-scripts"
        );
    }

    #[test]
    fn overlay_keeps_existing_search_path_as_suffix() {
        let mut base = BTreeMap::new();
        base.insert(SEARCH_PATH_VAR.to_string(), "/usr/lib/py".to_string());
        let env = overlay().merged_over(base);
        assert_eq!(
            env.get(SEARCH_PATH_VAR).unwrap(),
            "/opt/kohya:/opt/kohya/sd-scripts:/usr/lib/py"
        );
    }

    #[test]
    fn overlay_forces_onednn_flag_off() {
        let mut base = BTreeMap::new();
        base.insert("TF_ENABLE_ONEDNN_OPTS".to_string(), "1".to_string());
        let env = overlay().merged_over(base);
        assert_eq!(env.get("TF_ENABLE_ONEDNN_OPTS").unwrap(), "0");
    }

    #[test]
    fn overlay_preserves_unrelated_variables() {
        let mut base = BTreeMap::new();
        base.insert("HOME".to_string(), "/home/u".to_string());
        let env = overlay().merged_over(base);
        assert_eq!(env.get("HOME").unwrap(), "/home/u");
    }
}
