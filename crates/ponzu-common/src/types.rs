//! Domain primitive types used across the ponzu build workspace.

use std::path::{Path, PathBuf};

use crate::constants;

/// Filesystem layout of a project checkout.
///
/// Paths are derived purely from the project directory and the configured
/// tool and module names; nothing is checked for existence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    project_dir: PathBuf,
    tool_name: String,
    content_dir: PathBuf,
    addons_dir: PathBuf,
    build_dir: PathBuf,
    vendor_dir: PathBuf,
    content_vendor_dir: PathBuf,
}

impl ProjectLayout {
    /// Derives the layout for `project_dir`.
    #[must_use]
    pub fn new(project_dir: &Path, tool_name: &str, module_path: &str) -> Self {
        let build_dir = project_dir.join(constants::CMD_DIR).join(tool_name);
        let vendor_dir = build_dir.join(constants::VENDOR_DIR);
        let content_vendor_dir = module_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(vendor_dir.clone(), |acc, segment| acc.join(segment))
            .join(constants::CONTENT_DIR);

        Self {
            project_dir: project_dir.to_path_buf(),
            tool_name: tool_name.to_string(),
            content_dir: project_dir.join(constants::CONTENT_DIR),
            addons_dir: project_dir.join(constants::ADDONS_DIR),
            build_dir,
            vendor_dir,
            content_vendor_dir,
        }
    }

    /// Returns the project root.
    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Returns the user content source tree.
    #[must_use]
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Returns the optional addons source tree.
    #[must_use]
    pub fn addons_dir(&self) -> &Path {
        &self.addons_dir
    }

    /// Returns the build subdirectory (`cmd/<tool>`).
    #[must_use]
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Returns the vendor root the compiler reads.
    #[must_use]
    pub fn vendor_dir(&self) -> &Path {
        &self.vendor_dir
    }

    /// Returns the vendored location of the content package.
    #[must_use]
    pub fn content_vendor_dir(&self) -> &Path {
        &self.content_vendor_dir
    }

    /// Returns the build subdirectory relative to the project root, with
    /// forward slashes (`cmd/<tool>`).
    #[must_use]
    pub fn build_subdir(&self) -> String {
        format!("{}/{}", constants::CMD_DIR, self.tool_name)
    }

    /// Returns the package path handed to the compiler (`./cmd/<tool>`).
    #[must_use]
    pub fn package_path(&self) -> String {
        format!("./{}", self.build_subdir())
    }
}
