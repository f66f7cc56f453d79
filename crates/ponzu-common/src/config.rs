//! Configuration model for a single pipeline run.
//!
//! Values are layered from lowest to highest precedence: built-in
//! defaults, the optional `ponzu.json` in the project directory, the
//! workspace environment variable, and finally CLI flags applied through
//! the `with_*` builders.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{PonzuError, Result};
use crate::types::ProjectLayout;

/// Root configuration passed explicitly into every pipeline entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PonzuConfig {
    /// Project checkout the pipeline operates on.
    pub project_dir: PathBuf,
    /// Root under which importable packages live (`<root>/src/...`).
    pub workspace_root: Option<PathBuf>,
    /// Compiler toolchain binary.
    pub toolchain: String,
    /// Path of the host-built binary, relative to the project directory.
    pub output_name: String,
    /// Tool whose build subdirectory is `cmd/<tool_name>`.
    pub tool_name: String,
    /// Import path of the vendored core module.
    pub module_path: String,
    /// Container runtime CLI.
    pub container_runtime: String,
    /// Image used for the default dependency fetch and cross-build.
    pub builder_image: String,
    /// Dockerfile used to package the prebuilt binary.
    pub dockerfile: String,
    /// Name of the binary produced by the containerized build.
    pub container_output: String,
}

/// On-disk shape of `ponzu.json`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Overrides the workspace root when the environment does not set one.
    pub workspace_root: Option<PathBuf>,
    /// Overrides [`PonzuConfig::toolchain`].
    pub toolchain: Option<String>,
    /// Overrides [`PonzuConfig::output_name`].
    pub output_name: Option<String>,
    /// Overrides [`PonzuConfig::tool_name`].
    pub tool_name: Option<String>,
    /// Overrides [`PonzuConfig::module_path`].
    pub module_path: Option<String>,
    /// Overrides [`PonzuConfig::container_runtime`].
    pub container_runtime: Option<String>,
    /// Overrides [`PonzuConfig::builder_image`].
    pub builder_image: Option<String>,
    /// Overrides [`PonzuConfig::dockerfile`].
    pub dockerfile: Option<String>,
    /// Overrides [`PonzuConfig::container_output`].
    pub container_output: Option<String>,
}

impl ConfigFile {
    /// Reads `ponzu.json` from the project directory, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read(project_dir: &Path) -> Result<Option<Self>> {
        let path = project_dir.join(constants::CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        tracing::debug!(path = %path.display(), "reading project configuration");
        let raw = std::fs::read_to_string(&path).map_err(|e| PonzuError::io(&path, e))?;
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

impl PonzuConfig {
    /// Creates a configuration with built-in defaults for `project_dir`.
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            workspace_root: None,
            toolchain: constants::DEFAULT_TOOLCHAIN.to_string(),
            output_name: default_output_name(),
            tool_name: constants::DEFAULT_TOOL_NAME.to_string(),
            module_path: constants::DEFAULT_MODULE_PATH.to_string(),
            container_runtime: constants::DEFAULT_CONTAINER_RUNTIME.to_string(),
            builder_image: constants::DEFAULT_BUILDER_IMAGE.to_string(),
            dockerfile: constants::DEFAULT_DOCKERFILE.to_string(),
            container_output: constants::DEFAULT_CONTAINER_OUTPUT.to_string(),
        }
    }

    /// Loads the configuration for `project_dir`.
    ///
    /// `workspace_env` is the raw value of the workspace variable (or the
    /// flag that overrides it). When it is a path list only the first entry
    /// is used. Without it, the config file's `workspace_root` applies, then
    /// `$HOME/go`.
    ///
    /// # Errors
    ///
    /// Returns an error if `ponzu.json` exists but is malformed.
    pub fn load(project_dir: impl Into<PathBuf>, workspace_env: Option<&OsStr>) -> Result<Self> {
        let mut config = Self::new(project_dir);
        let file = ConfigFile::read(&config.project_dir)?.unwrap_or_default();
        config.workspace_root = workspace_env
            .and_then(first_path)
            .or_else(|| file.workspace_root.clone())
            .or_else(home_workspace);
        config.apply_file(file);
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Overlays the values present in a config file.
    pub fn apply_file(&mut self, file: ConfigFile) {
        let ConfigFile {
            workspace_root: _,
            toolchain,
            output_name,
            tool_name,
            module_path,
            container_runtime,
            builder_image,
            dockerfile,
            container_output,
        } = file;
        override_with(&mut self.toolchain, toolchain);
        override_with(&mut self.output_name, output_name);
        override_with(&mut self.tool_name, tool_name);
        override_with(&mut self.module_path, module_path);
        override_with(&mut self.container_runtime, container_runtime);
        override_with(&mut self.builder_image, builder_image);
        override_with(&mut self.dockerfile, dockerfile);
        override_with(&mut self.container_output, container_output);
    }

    /// Sets the workspace root.
    #[must_use]
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Sets the compiler toolchain binary.
    #[must_use]
    pub fn with_toolchain(mut self, toolchain: impl Into<String>) -> Self {
        self.toolchain = toolchain.into();
        self
    }

    /// Sets the host-built binary path.
    #[must_use]
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    /// Returns the workspace root or a configuration error if none is set.
    ///
    /// # Errors
    ///
    /// Returns [`PonzuError::Config`] when no workspace root was configured.
    pub fn require_workspace_root(&self) -> Result<&Path> {
        self.workspace_root
            .as_deref()
            .ok_or_else(|| PonzuError::Config {
                message: format!(
                    "workspace root is not set (export {} or pass --workspace-root)",
                    constants::WORKSPACE_ENV
                ),
            })
    }

    /// Derives the on-disk project layout.
    #[must_use]
    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout::new(&self.project_dir, &self.tool_name, &self.module_path)
    }
}

fn override_with(slot: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn default_output_name() -> String {
    format!(
        "{}{}",
        constants::DEFAULT_OUTPUT_NAME,
        std::env::consts::EXE_SUFFIX
    )
}

fn first_path(value: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(value).find(|p| !p.as_os_str().is_empty())
}

fn home_workspace() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join("go"))
}
