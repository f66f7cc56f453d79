//! Fixed names and default paths.

/// Application name used in CLI output.
pub const APP_NAME: &str = "ponzu";

/// Directory holding user content definitions, relative to the project.
pub const CONTENT_DIR: &str = "content";

/// Directory holding optional feature addons, relative to the project.
pub const ADDONS_DIR: &str = "addons";

/// Directory containing the per-tool build subdirectories.
pub const CMD_DIR: &str = "cmd";

/// Name of the vendor directory inside the build subdirectory.
pub const VENDOR_DIR: &str = "vendor";

/// Documentation-only file shipped by both the vendored scaffold and the
/// user content tree. Never reported as a conflict.
pub const CONTENT_DOC_FILE: &str = "doc.go";

/// Optional per-project configuration file.
pub const CONFIG_FILE: &str = "ponzu.json";

/// Default compiler toolchain command.
pub const DEFAULT_TOOLCHAIN: &str = "go";

/// Default name of the tool whose build subdirectory is `cmd/<tool>`.
pub const DEFAULT_TOOL_NAME: &str = "ponzu";

/// Default import path of the vendored core module.
pub const DEFAULT_MODULE_PATH: &str = "github.com/ponzu-cms/ponzu";

/// Default base name of the host-built binary.
pub const DEFAULT_OUTPUT_NAME: &str = "ponzu-server";

/// Default container runtime CLI.
pub const DEFAULT_CONTAINER_RUNTIME: &str = "docker";

/// Default image used to fetch dependencies and cross-compile.
pub const DEFAULT_BUILDER_IMAGE: &str = "golang:1.8.1";

/// Default Dockerfile used to package the prebuilt binary.
pub const DEFAULT_DOCKERFILE: &str = "deployment/docker/Dockerfile.prebuilt";

/// Default name of the statically linked binary built inside the container.
pub const DEFAULT_CONTAINER_OUTPUT: &str = "ponzu-server-docker";

/// Environment variable naming the workspace root.
pub const WORKSPACE_ENV: &str = "GOPATH";

/// Workspace-relative segment every importable package lives under.
pub const WORKSPACE_SRC: &str = "src";

/// Mount point of the workspace root inside the builder container.
pub const CONTAINER_WORKSPACE: &str = "/go";
