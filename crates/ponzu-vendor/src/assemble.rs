//! Vendor tree assembly.
//!
//! Mirrors `content/` into the vendored content package, then overlays
//! `addons/` verbatim onto the vendor root. Only the vendored content
//! package is cleared; the framework scaffold elsewhere under the vendor
//! root is left in place and addons may overwrite it.

use ponzu_common::constants::CONTENT_DOC_FILE;
use ponzu_common::error::Result;
use ponzu_common::types::ProjectLayout;

use crate::merge::{self, MergeReport, MergeSpec};

/// Merge spec for the user content tree.
#[must_use]
pub fn content_spec(layout: &ProjectLayout) -> MergeSpec {
    MergeSpec::new(layout.content_dir(), layout.content_vendor_dir()).excluding([CONTENT_DOC_FILE])
}

/// Merge spec for the addon tree.
#[must_use]
pub fn addons_spec(layout: &ProjectLayout) -> MergeSpec {
    MergeSpec::new(layout.addons_dir(), layout.vendor_dir())
}

/// Rebuilds the vendor tree from the project's content and addons.
///
/// Returns the combined report of both copies; addon files that replace
/// vendored scaffold or content files are listed there as conflicts.
///
/// # Errors
///
/// Returns the first filesystem error encountered.
pub fn assemble(layout: &ProjectLayout) -> Result<MergeReport> {
    tracing::info!(vendor = %layout.vendor_dir().display(), "assembling vendor tree");

    let mut report = merge::merge(&content_spec(layout))?;
    report.absorb(merge::overlay(&addons_spec(layout))?);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use ponzu_common::error::PonzuError;
    use walkdir::WalkDir;

    use super::*;

    fn layout(root: &Path) -> ProjectLayout {
        ProjectLayout::new(root, "ponzu", "github.com/ponzu-cms/ponzu")
    }

    fn write(root: &Path, relative: &str, body: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, body).expect("write");
    }

    fn files(root: &Path) -> Vec<PathBuf> {
        let mut out: Vec<_> = WalkDir::new(root)
            .into_iter()
            .map(|e| e.expect("walk"))
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().strip_prefix(root).expect("prefix").to_path_buf())
            .collect();
        out.sort();
        out
    }

    #[test]
    fn content_only_project_vendors_exactly_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "content/post.go", "package content");
        let layout = layout(dir.path());

        let report = assemble(&layout).expect("assemble");

        assert_eq!(report.files_copied, 1);
        assert_eq!(
            files(layout.vendor_dir()),
            vec![PathBuf::from("github.com/ponzu-cms/ponzu/content/post.go")]
        );
    }

    #[test]
    fn addons_keep_their_directory_structure() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "content/post.go", "package content");
        write(dir.path(), "addons/github.com/bosssauce/reference/reference.go", "package reference");
        let layout = layout(dir.path());

        let report = assemble(&layout).expect("assemble");

        assert!(report.conflicts.is_empty());
        assert!(
            layout
                .vendor_dir()
                .join("github.com/bosssauce/reference/reference.go")
                .is_file()
        );
    }

    #[test]
    fn addon_shadowing_content_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "content/post.go", "from content");
        write(dir.path(), "addons/github.com/ponzu-cms/ponzu/content/post.go", "from addon");
        let layout = layout(dir.path());

        let report = assemble(&layout).expect("assemble");

        assert_eq!(report.conflicts.len(), 1);
        let vendored = layout.content_vendor_dir().join("post.go");
        assert_eq!(std::fs::read_to_string(vendored).expect("read"), "from addon");
    }

    #[test]
    fn scaffold_outside_content_survives_assembly() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "content/post.go", "package content");
        write(
            dir.path(),
            "cmd/ponzu/vendor/github.com/ponzu-cms/ponzu/system/api/api.go",
            "package api",
        );
        let layout = layout(dir.path());

        let report = assemble(&layout).expect("assemble");

        assert!(report.conflicts.is_empty());
        let scaffold = layout
            .vendor_dir()
            .join("github.com/ponzu-cms/ponzu/system/api/api.go");
        assert_eq!(std::fs::read_to_string(scaffold).expect("read"), "package api");
    }

    #[test]
    fn addon_overwriting_scaffold_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(
            dir.path(),
            "cmd/ponzu/vendor/github.com/ponzu-cms/ponzu/system/api/api.go",
            "scaffold",
        );
        write(dir.path(), "addons/github.com/ponzu-cms/ponzu/system/api/api.go", "patched");
        let layout = layout(dir.path());

        let report = assemble(&layout).expect("assemble");

        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(
            report.conflicts[0].relative,
            PathBuf::from("github.com/ponzu-cms/ponzu/system/api/api.go")
        );
        let scaffold = layout
            .vendor_dir()
            .join("github.com/ponzu-cms/ponzu/system/api/api.go");
        assert_eq!(std::fs::read_to_string(scaffold).expect("read"), "patched");
    }

    #[test]
    fn stale_vendored_content_does_not_survive() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "content/post.go", "package content");
        write(dir.path(), "cmd/ponzu/vendor/github.com/ponzu-cms/ponzu/content/removed.go", "stale");
        let layout = layout(dir.path());

        let _ = assemble(&layout).expect("assemble");

        assert!(!layout.content_vendor_dir().join("removed.go").exists());
        assert!(layout.content_vendor_dir().join("post.go").is_file());
    }

    #[test]
    fn missing_content_and_addons_yield_empty_content_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = layout(dir.path());

        let report = assemble(&layout).expect("assemble");

        assert_eq!(report.files_copied, 0);
        assert!(layout.content_vendor_dir().is_dir());
        assert!(files(layout.vendor_dir()).is_empty());
    }

    #[test]
    fn unwritable_vendor_location_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "cmd/ponzu", "a file where the build dir should be");
        let layout = layout(dir.path());

        let err = assemble(&layout).expect_err("vendor blocked");
        assert!(matches!(err, PonzuError::Io { .. }));
    }
}
