//! Host compilation of the project binary.

use std::path::Path;

use ponzu_common::config::PonzuConfig;
use ponzu_common::error::Result;

use crate::process::{self, Invocation, ProcessRunner};

/// Parameters of a single toolchain build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    output_name: String,
    toolchain: String,
    package_path: String,
}

impl BuildRequest {
    /// Creates a build request.
    #[must_use]
    pub fn new(
        output_name: impl Into<String>,
        toolchain: impl Into<String>,
        package_path: impl Into<String>,
    ) -> Self {
        Self {
            output_name: output_name.into(),
            toolchain: toolchain.into(),
            package_path: package_path.into(),
        }
    }

    /// Builds the request for the configured project.
    #[must_use]
    pub fn from_config(config: &PonzuConfig) -> Self {
        Self::new(
            &config.output_name,
            &config.toolchain,
            config.layout().package_path(),
        )
    }

    /// Returns the path of the produced binary.
    #[must_use]
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Returns the `<toolchain> build -o <output> <package>` invocation.
    #[must_use]
    pub fn invocation(&self, project_dir: &Path) -> Invocation {
        Invocation::new(&self.toolchain)
            .args(["build", "-o", &self.output_name, &self.package_path])
            .current_dir(project_dir)
    }
}

/// Compiles the package into the requested output binary.
///
/// # Errors
///
/// Returns a launch error if the toolchain cannot be started, or an exit
/// error if the build fails.
pub fn build<R: ProcessRunner + ?Sized>(
    runner: &R,
    request: &BuildRequest,
    project_dir: &Path,
) -> Result<()> {
    tracing::info!(
        toolchain = %request.toolchain,
        output = %request.output_name,
        package = %request.package_path,
        "compiling project"
    );
    process::run_checked(runner, &request.invocation(project_dir))
}
