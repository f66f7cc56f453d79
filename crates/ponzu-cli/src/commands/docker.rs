//! `ponzu docker` — Build the server for a container and package the image.

use clap::Args;
use ponzu_common::config::PonzuConfig;
use ponzu_toolchain::image::ImageTagSet;
use ponzu_toolchain::pipeline::{DockerOptions, Pipeline};
use ponzu_toolchain::process::SystemRunner;

use crate::output::{self, ConsoleReporter};

/// Arguments for the `docker` command.
#[derive(Args, Debug)]
pub struct DockerArgs {
    /// Tag to add to the image; repeat or separate with commas.
    #[arg(short = 't', long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Dependency command run in the build subdirectory instead of the
    /// default containerized dependency fetch and build.
    #[arg(long)]
    pub depcmd: Option<String>,
}

/// Executes the `docker` command.
///
/// # Errors
///
/// Returns an error if vendoring, the container-side build, or the image
/// build fails.
pub fn execute(args: DockerArgs, config: &PonzuConfig) -> anyhow::Result<()> {
    tracing::info!(project = %config.project_dir.display(), tags = ?args.tags, "building image");
    output::print_header();

    let options = DockerOptions {
        tags: ImageTagSet::new(args.tags),
        dependency_command: args.depcmd,
    };
    let tagged = !options.tags.is_empty();
    let summary = options.tags.as_slice().join(", ");

    let runner = SystemRunner::new();
    let _ = Pipeline::docker(config, &runner, options)
        .with_reporter(&ConsoleReporter)
        .run()?;

    if tagged {
        output::print_done(&format!("Image built: {summary}"));
    } else {
        output::print_done("Image built (untagged)");
    }
    Ok(())
}
