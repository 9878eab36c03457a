// src/watch/classify.rs

//! Decide what a batch of changed files means for the running app.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::trace;

use crate::config::Settings;
use crate::errors::{GobError, Result};
use crate::watch::path_utils::{has_hidden_component, relative_str};

/// Result of classifying one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// A build-type file changed; rebuild and restart.
    pub app: bool,
    /// Changed template files, relative to the source root.
    pub views: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        !self.app && self.views.is_empty()
    }
}

/// Extension and glob rules for changed paths.
#[derive(Debug, Clone)]
pub struct ChangeClassifier {
    root: PathBuf,
    build_types: Vec<String>,
    template_types: Vec<String>,
    ignore_types: Vec<String>,
    exclude: Option<GlobSet>,
}

impl ChangeClassifier {
    pub fn new(
        root: impl Into<PathBuf>,
        build_types: Vec<String>,
        template_types: Vec<String>,
        ignore_types: Vec<String>,
        exclude: &[String],
    ) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            build_types,
            template_types,
            ignore_types,
            exclude: compile_globs(exclude)?,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.src_dir.clone(),
            settings.build_types.clone(),
            settings.template_types.clone(),
            settings.ignore_types.clone(),
            &settings.exclude,
        )
    }

    pub fn classify<P: AsRef<Path>>(&self, paths: &[P]) -> ChangeSet {
        let mut set = ChangeSet::default();

        for path in paths {
            let path = path.as_ref();
            let rel = relative_str(&self.root, path)
                .unwrap_or_else(|| path.to_string_lossy().replace('\\', "/"));

            if has_hidden_component(&rel) {
                trace!(path = %rel, "ignoring hidden entry");
                continue;
            }
            if matches_extension(&rel, &self.ignore_types) {
                continue;
            }
            if self.exclude.as_ref().is_some_and(|globs| globs.is_match(&rel)) {
                trace!(path = %rel, "excluded by glob");
                continue;
            }

            if matches_extension(&rel, &self.build_types) {
                set.app = true;
            } else if matches_extension(&rel, &self.template_types) && !set.views.contains(&rel) {
                set.views.push(rel);
            }
        }

        set
    }
}

fn matches_extension(rel: &str, extensions: &[String]) -> bool {
    let name = rel.rsplit('/').next().unwrap_or(rel);
    extensions.iter().any(|ext| name.len() > ext.len() && name.ends_with(ext.as_str()))
}

fn compile_globs(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| GobError::ConfigError(format!("invalid exclude glob '{pattern}': {e}")))?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .map_err(|e| GobError::ConfigError(format!("building exclude globs: {e}")))?;
    Ok(Some(set))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(exclude: &[&str]) -> ChangeClassifier {
        let exclude: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();
        ChangeClassifier::new(
            "/go/src",
            vec![".go".into()],
            vec![".soy".into()],
            vec![".js".into(), ".css".into()],
            &exclude,
        )
        .unwrap()
    }

    #[test]
    fn go_files_mark_the_app_changed() {
        let set = classifier(&[]).classify(&["/go/src/app/main/main.go"]);
        assert!(set.app);
        assert!(set.views.is_empty());
    }

    #[test]
    fn templates_are_collected_once() {
        let set = classifier(&[]).classify(&[
            "/go/src/app/views/index.soy",
            "/go/src/app/views/index.soy",
            "/go/src/app/static/site.css",
        ]);
        assert!(!set.app);
        assert_eq!(set.views, vec!["app/views/index.soy"]);
    }

    #[test]
    fn hidden_ignored_and_excluded_paths_are_dropped() {
        let set = classifier(&["**/testdata/**"]).classify(&[
            "/go/src/app/.main.go.swp",
            "/go/src/app/.git/index.go",
            "/go/src/app/testdata/fixture.go",
            "/go/src/app/web/bundle.js",
        ]);
        assert!(set.is_empty());
    }

    #[test]
    fn bad_glob_is_a_config_error() {
        let err = ChangeClassifier::new("/", vec![".go".into()], vec![], vec![], &["a[".into()])
            .unwrap_err();
        assert!(matches!(err, GobError::ConfigError(_)));
    }
}
