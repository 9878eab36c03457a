// src/deps/watch_set.rs

use std::path::{Path, PathBuf};

/// Final list of directories handed to the file watcher.
///
/// Dependency directories come first, in filter order, and are watched
/// non-recursively. Root package directories are always present, come last,
/// and are watched recursively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSet {
    dependencies: Vec<PathBuf>,
    packages: Vec<PathBuf>,
}

impl WatchSet {
    /// Join `source_root` with every selected dependency and every root
    /// package.
    ///
    /// A dependency that is itself one of the root packages is only listed
    /// once, as a package.
    pub fn new<S: AsRef<str>>(source_root: &Path, selected: &[S], packages: &[S]) -> Self {
        let packages: Vec<PathBuf> = packages
            .iter()
            .map(|p| source_root.join(p.as_ref()))
            .collect();

        let dependencies = selected
            .iter()
            .map(|d| source_root.join(d.as_ref()))
            .filter(|d| !packages.contains(d))
            .collect();

        Self {
            dependencies,
            packages,
        }
    }

    /// Watch set without any dependencies: just the root packages.
    pub fn packages_only<S: AsRef<str>>(source_root: &Path, packages: &[S]) -> Self {
        Self::new::<S>(source_root, &[], packages)
    }

    pub fn dependency_dirs(&self) -> &[PathBuf] {
        &self.dependencies
    }

    pub fn package_dirs(&self) -> &[PathBuf] {
        &self.packages
    }

    /// Every directory, dependencies first and packages last.
    pub fn dirs(&self) -> impl Iterator<Item = &Path> {
        self.dependencies
            .iter()
            .chain(self.packages.iter())
            .map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.dependencies.len() + self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_package_is_appended_last() {
        let ws = WatchSet::new(Path::new("/src"), &["app/util", "vendor/lib/json"], &["app/main"]);
        let dirs: Vec<&Path> = ws.dirs().collect();
        assert_eq!(
            dirs,
            vec![
                Path::new("/src/app/util"),
                Path::new("/src/vendor/lib/json"),
                Path::new("/src/app/main"),
            ]
        );
    }

    #[test]
    fn package_survives_an_empty_selection() {
        let ws = WatchSet::packages_only(Path::new("/src"), &["app/main"]);
        assert_eq!(ws.len(), 1);
        assert_eq!(ws.package_dirs(), &[PathBuf::from("/src/app/main")]);
    }

    #[test]
    fn root_package_imported_by_another_is_listed_once() {
        let ws = WatchSet::new(Path::new("/src"), &["app/api"], &["app/web", "app/api"]);
        assert!(ws.dependency_dirs().is_empty());
        assert_eq!(ws.len(), 2);
    }
}
