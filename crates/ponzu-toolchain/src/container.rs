//! Building the binary that goes into the container image.
//!
//! Either the user's dependency command runs in the build subdirectory, or
//! a throwaway builder container fetches dependencies and cross-compiles a
//! static binary into the project root.

use std::path::{Path, PathBuf};

use ponzu_common::config::PonzuConfig;
use ponzu_common::constants::{CONTAINER_WORKSPACE, WORKSPACE_SRC};
use ponzu_common::error::{PonzuError, Result};
use ponzu_vendor::package::PackageIdentity;

use crate::process::{self, Invocation, ProcessRunner};

/// Compiler used inside the builder image.
const CONTAINER_TOOLCHAIN: &str = "go";

/// Parameters of the container-side build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerBuildRequest {
    dependency_command: Option<String>,
    package: PackageIdentity,
    project_dir: PathBuf,
}

impl ContainerBuildRequest {
    /// Creates a request. A blank dependency command counts as absent.
    #[must_use]
    pub fn new(
        dependency_command: Option<&str>,
        package: PackageIdentity,
        project_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            dependency_command: dependency_command
                .filter(|cmd| !cmd.trim().is_empty())
                .map(str::to_string),
            package,
            project_dir: project_dir.into(),
        }
    }

    /// Returns the custom dependency command, if any.
    #[must_use]
    pub fn dependency_command(&self) -> Option<&str> {
        self.dependency_command.as_deref()
    }

    /// Returns the resolved package identity.
    #[must_use]
    pub const fn package(&self) -> &PackageIdentity {
        &self.package
    }

    /// Returns the host project directory.
    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }
}

/// Splits a dependency command on whitespace into an invocation that runs
/// in `build_dir`.
///
/// # Errors
///
/// Returns [`PonzuError::Config`] if the command has no program.
pub fn dependency_invocation(command: &str, build_dir: &Path) -> Result<Invocation> {
    let mut words = command.split_whitespace();
    let program = words.next().ok_or_else(|| PonzuError::Config {
        message: "dependency command is empty".into(),
    })?;
    Ok(Invocation::new(program).args(words).current_dir(build_dir))
}

/// Builds the default `run` invocation of the builder container.
///
/// The project is mounted at `/go/src/<package>`, the container works in
/// the mounted build subdirectory, and the static binary is written to the
/// mounted project root.
#[must_use]
pub fn default_invocation(config: &PonzuConfig, request: &ContainerBuildRequest) -> Invocation {
    let layout = config.layout();
    let build_subdir = layout.build_subdir();
    let mount_point = format!("{CONTAINER_WORKSPACE}/{WORKSPACE_SRC}/{}", request.package);
    let volume = format!("{}:{mount_point}", request.project_dir.display());
    let workdir = format!("{mount_point}/{build_subdir}");
    let to_project_root = "../".repeat(build_subdir.split('/').count());

    let script = format!(
        "{CONTAINER_TOOLCHAIN} get ./... && CGO_ENABLED=0 {CONTAINER_TOOLCHAIN} build -tags netgo \
         -ldflags \"-s -w -extldflags '-static'\" -o {to_project_root}{} .",
        config.container_output
    );

    Invocation::new(&config.container_runtime)
        .args(["run", "--rm", "-w", &workdir, "-v", &volume])
        .args([config.builder_image.as_str(), "sh", "-c", &script])
        .current_dir(&request.project_dir)
}

/// Produces the binary that the image build packages.
///
/// # Errors
///
/// Returns a configuration error for an unusable dependency command, a
/// launch error if the program cannot start, or an exit error if it fails.
pub fn build_for_container<R: ProcessRunner + ?Sized>(
    runner: &R,
    config: &PonzuConfig,
    request: &ContainerBuildRequest,
) -> Result<()> {
    let invocation = match request.dependency_command() {
        Some(command) => {
            tracing::info!(command, "running custom dependency command");
            dependency_invocation(command, config.layout().build_dir())?
        }
        None => {
            tracing::info!(
                package = %request.package,
                image = %config.builder_image,
                "building static binary in builder container"
            );
            default_invocation(config, request)
        }
    };
    process::run_checked(runner, &invocation)
}
