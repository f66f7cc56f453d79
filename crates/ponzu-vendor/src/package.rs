//! Package identity resolution.
//!
//! The importable identity of a project is its path below
//! `<workspace>/src`. Resolution is purely lexical: nothing is checked for
//! existence and symlinks are not followed.

use std::fmt;
use std::path::{Component, Path};

use ponzu_common::config::PonzuConfig;
use ponzu_common::constants::WORKSPACE_SRC;
use ponzu_common::error::{PonzuError, Result};

/// Import path of a project, e.g. `example.com/proj`.
///
/// Only obtainable through [`PackageIdentity::resolve`], so a value always
/// names a descendant of `<workspace>/src`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageIdentity(String);

impl PackageIdentity {
    /// Resolves the identity of `working_dir` relative to `workspace_root`.
    ///
    /// # Errors
    ///
    /// Returns [`PonzuError::NotInWorkspace`] unless `working_dir` lies
    /// strictly below `<workspace_root>/src`.
    pub fn resolve(workspace_root: &Path, working_dir: &Path) -> Result<Self> {
        let not_in_workspace = || PonzuError::NotInWorkspace {
            working_dir: working_dir.to_path_buf(),
            workspace_root: workspace_root.to_path_buf(),
        };

        let relative = working_dir
            .strip_prefix(workspace_root)
            .map_err(|_| not_in_workspace())?;

        let mut components = relative.components();
        match components.next() {
            Some(Component::Normal(first)) if first == WORKSPACE_SRC => {}
            _ => return Err(not_in_workspace()),
        }

        let mut segments = Vec::new();
        for component in components {
            match component {
                Component::Normal(segment) => segments.push(segment.to_string_lossy()),
                Component::CurDir => {}
                _ => return Err(not_in_workspace()),
            }
        }
        if segments.is_empty() {
            return Err(not_in_workspace());
        }

        let identity = Self(segments.join("/"));
        tracing::debug!(identity = %identity, "resolved package identity");
        Ok(identity)
    }

    /// Returns the identity as an import path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves the identity of the configured project directory.
///
/// # Errors
///
/// Returns [`PonzuError::Config`] if no workspace root is configured, or
/// [`PonzuError::NotInWorkspace`] if the project lies outside it.
pub fn resolve_package_identity(config: &PonzuConfig) -> Result<PackageIdentity> {
    let workspace_root = config.require_workspace_root()?;
    PackageIdentity::resolve(workspace_root, &config.project_dir)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ponzu_common::error::ErrorKind;

    use super::*;

    #[test]
    fn resolves_path_below_workspace_src() {
        let id = PackageIdentity::resolve(Path::new("/ws"), Path::new("/ws/src/example.com/proj"))
            .expect("resolve");
        assert_eq!(id.as_str(), "example.com/proj");
        assert_eq!(id.to_string(), "example.com/proj");
    }

    #[test]
    fn rejects_directory_outside_workspace() {
        let err = PackageIdentity::resolve(Path::new("/ws"), Path::new("/tmp/proj"))
            .expect_err("outside");
        assert!(matches!(err, PonzuError::NotInWorkspace { .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn rejects_workspace_sibling_of_src() {
        let err = PackageIdentity::resolve(Path::new("/ws"), Path::new("/ws/pkg/example.com/proj"))
            .expect_err("not under src");
        assert!(matches!(err, PonzuError::NotInWorkspace { .. }));
    }

    #[test]
    fn rejects_segment_that_only_starts_with_src() {
        assert!(PackageIdentity::resolve(Path::new("/ws"), Path::new("/ws/srcx/proj")).is_err());
    }

    #[test]
    fn rejects_src_itself() {
        assert!(PackageIdentity::resolve(Path::new("/ws"), Path::new("/ws/src")).is_err());
    }

    #[test]
    fn rejects_parent_traversal() {
        assert!(PackageIdentity::resolve(Path::new("/ws"), Path::new("/ws/src/../etc")).is_err());
    }

    #[test]
    fn resolution_does_not_touch_the_filesystem() {
        let id = PackageIdentity::resolve(
            Path::new("/definitely/not/here"),
            Path::new("/definitely/not/here/src/a/b/c"),
        )
        .expect("resolve");
        assert_eq!(id.as_str(), "a/b/c");
    }

    #[test]
    fn resolve_from_config_requires_workspace_root() {
        let config = PonzuConfig::new("/ws/src/example.com/proj");
        assert!(matches!(
            resolve_package_identity(&config),
            Err(PonzuError::Config { .. })
        ));

        let config = config.with_workspace_root(PathBuf::from("/ws"));
        let id = resolve_package_identity(&config).expect("resolve");
        assert_eq!(id.as_str(), "example.com/proj");
    }
}
